//! `dbsource check`: print a template's last-modified timestamp.

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
    let checking = loader.freshness_check_enabled();

    let locator = loader
        .find(&args.name)?
        .ok_or_else(|| CliError::TemplateNotFound {
            name: args.name.clone(),
        })?;
    let result = loader.last_modified(&locator);
    loader.close(&locator)?;
    let stamp = result?;

    let rfc3339 = stamp
        .to_datetime()
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true));

    if output.is_json() {
        output.json(&json!({
            "name": args.name,
            "locator": locator,
            "last_modified": stamp,
            "last_modified_rfc3339": rfc3339,
            "freshness_check": checking,
        }))?;
        return Ok(());
    }

    output.data(&stamp.to_string())?;
    output.field("locator", locator.as_str())?;
    if let Some(rfc3339) = rfc3339 {
        output.field("modified", &rfc3339)?;
    }
    if !checking {
        output.warning("Freshness checking is disabled; the timestamp is the current time")?;
    }
    Ok(())
}
