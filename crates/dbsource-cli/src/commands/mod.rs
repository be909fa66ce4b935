//! Command handlers, one module per subcommand.

pub mod check;
pub mod completions;
pub mod config;
pub mod exec;
pub mod find;
pub mod init;
pub mod read;

use tracing::info;

use dbsource_adapters::PgConnection;
use dbsource_core::{application::DatabaseTemplateLoader, error::LoaderError};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Connect to the template database described by `config`.
pub(crate) fn open_loader(config: &AppConfig) -> CliResult<DatabaseTemplateLoader<PgConnection>> {
    let url = config
        .database
        .url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or(CliError::MissingDatabaseUrl)?;
    let calls = config
        .calls
        .to_loader_calls()
        .map_err(LoaderError::from)?;

    let loader = DatabaseTemplateLoader::connect(calls, || {
        PgConnection::connect(url).map_err(Into::into)
    })?;
    info!(%loader, "connected to template database");
    Ok(loader)
}
