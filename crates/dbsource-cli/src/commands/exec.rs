//! `dbsource exec`: run an external command and print its output.

use serde_json::json;
use tracing::{debug, instrument};

use dbsource_adapters::ShellCommandExecutor;

use crate::{
    cli::{ExecArgs, GlobalArgs},
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: ExecArgs, _global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let executor = ShellCommandExecutor::new().with_encoding(&args.encoding)?;

    let result = match args.command.as_slice() {
        [single] => executor.execute(single)?,
        many => executor.execute_args(many)?,
    };
    debug!(
        code = result.exit_code(),
        stdout = result.stdout.len(),
        stderr = result.stderr.len(),
        "command finished"
    );

    if output.is_json() {
        output.json(&json!({
            "status": result.exit_code(),
            "encoding": executor.encoding(),
            "stdout": result.stdout,
            "stderr": result.stderr,
        }))?;
    } else {
        for line in &result.stdout {
            output.data(line)?;
        }
        for line in &result.stderr {
            eprintln!("{line}");
        }
    }

    if !result.success() {
        return Err(CliError::ExternalCommandFailed {
            command: args.command.join(" "),
            code: result.exit_code(),
        });
    }
    Ok(())
}
