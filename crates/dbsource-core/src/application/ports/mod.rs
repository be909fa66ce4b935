//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces between the
//! application and the outside world.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by the application, implemented by
//!   infrastructure
//!   - `Connection`: prepared backend calls over one connection
//!
//! - **Driving (Input) Ports**: Called by the templating engine, implemented
//!   by the application
//!   - `TemplateSourceLoader`: find / last-modified / read / close / reset

pub mod backend;
pub mod loader;

pub use backend::{BackendError, Connection, MarshalError, OutParam, OutValue, SourceReader};
pub use loader::TemplateSourceLoader;

#[cfg(test)]
pub use loader::MockTemplateSourceLoader;
