//! `dbsource find`: resolve a template name to its locator.

use serde_json::json;
use tracing::instrument;

use dbsource_core::application::ports::TemplateSourceLoader;

use crate::{
    cli::{GlobalArgs, TemplateArgs},
    commands::open_loader,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(template = %args.name))]
pub fn execute(
    args: TemplateArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let loader = open_loader(&config)?;

    let locator = loader
        .find(&args.name)?
        .ok_or_else(|| CliError::TemplateNotFound {
            name: args.name.clone(),
        })?;

    if output.is_json() {
        output.json(&json!({
            "name": args.name,
            "locator": locator,
        }))?;
    } else {
        output.data(locator.as_str())?;
    }

    loader.close(&locator)?;
    Ok(())
}
