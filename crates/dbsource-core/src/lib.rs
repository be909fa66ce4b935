//! dbsource Core - template sources served from a relational database
//!
//! This crate provides the loader a templating engine uses to obtain
//! template *sources* from database calls instead of the filesystem,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │     templating engine / dbsource-cli    │
//! │  (drives TemplateSourceLoader contract) │
//! └──────────────────┬──────────────────────┘
//!                    │ find / last_modified / read / close / reset
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        DatabaseTemplateLoader           │
//! │  one Mutex { connection, HandleCache }  │
//! └──────────────────┬──────────────────────┘
//!                    │ prepare / execute / close
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Connection port (trait)           │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   dbsource-adapters (PgConnection, …)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dbsource_core::prelude::*;
//!
//! # fn example<C: Connection>(connection: C) -> LoaderResult<()> {
//! let calls = LoaderCalls::new(
//!     "SELECT template_api.find_template($1)",
//!     "SELECT template_api.load_template($1)",
//!     None, // freshness checking disabled
//! )?;
//! let loader = DatabaseTemplateLoader::new(connection, calls);
//!
//! if let Some(locator) = loader.find("greet")? {
//!     let body = loader.read(&locator)?.into_string().expect("utf-8 source");
//!     println!("{body}");
//!     loader.close(&locator)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
pub(crate) mod test_support;

// Lets the shared test stub name this crate the same way from unit tests.
#[cfg(test)]
extern crate self as dbsource_core;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        DatabaseTemplateLoader, HandleCache, LoadedSource, SourceLookup, TemplateSourceService,
        ports::{
            BackendError, Connection, OutParam, OutValue, SourceReader, TemplateSourceLoader,
        },
    };
    pub use crate::domain::{
        CallDescriptor, CallKind, DomainError, FreshnessCheck, LoaderCalls, Locator, Timestamp,
    };
    pub use crate::error::{ErrorCategory, LoaderError, LoaderResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
