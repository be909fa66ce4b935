//! `dbsource read`: print a template's source.
//!
//! Goes through [`TemplateSourceService`] so the CLI sees a template exactly
//! the way an engine would: resolve, check, load, close.

use serde_json::json;
use tracing::{debug, instrument};

use dbsource_core::application::{SourceLookup, TemplateSourceService};

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
    let service = TemplateSourceService::new(Box::new(open_loader(&config)?));

    let source = match service.fetch(&args.name)? {
        SourceLookup::Found(source) => source,
        SourceLookup::NotFound => return Err(CliError::TemplateNotFound { name: args.name }),
        SourceLookup::Unavailable(err) => return Err(err.into()),
    };
    debug!(locator = %source.locator, bytes = source.body.len(), "template loaded");

    if output.is_json() {
        output.json(&json!({
            "name": source.name,
            "locator": source.locator,
            "last_modified": source.last_modified,
            "body": source.body,
        }))?;
    } else {
        output.data(&source.body)?;
    }
    Ok(())
}
