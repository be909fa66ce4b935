//! Infrastructure adapters for dbsource.
//!
//! This crate implements the ports defined in `dbsource-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod backend;
pub mod shell;
pub mod template_source;

// Re-export commonly used adapters
pub use backend::{PgBackendError, PgConnection};
pub use shell::{CommandOutput, ShellCommandExecutor, ShellError};
pub use template_source::InMemoryTemplateSource;
