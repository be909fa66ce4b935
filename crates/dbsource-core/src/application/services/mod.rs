//! Application services - implement and consume the loader contract.
//!
//! `DatabaseTemplateLoader` is the database-backed source; the
//! `TemplateSourceService` drives any source the way an engine would.

pub mod database_loader;
pub mod source_service;

pub use database_loader::DatabaseTemplateLoader;
pub use source_service::{LoadedSource, SourceLookup, TemplateSourceService};
