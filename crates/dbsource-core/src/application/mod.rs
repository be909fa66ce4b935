//! Application layer for dbsource.
//!
//! This layer contains:
//! - **Services**: the database loader and the engine-side source service
//! - **Handle cache**: lazily prepared backend calls
//! - **Ports**: Interface definitions (traits) for the backend and the engine
//!
//! Value types and configuration validation live in `crate::domain`.

pub mod handle_cache;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{DatabaseTemplateLoader, LoadedSource, SourceLookup, TemplateSourceService};

// Re-export port traits (for adapter implementation)
pub use ports::{Connection, SourceReader, TemplateSourceLoader};

pub use handle_cache::HandleCache;
