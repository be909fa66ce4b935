//! Core domain layer for dbsource.
//!
//! This module contains pure value types with no I/O. Backend access is
//! handled via ports (traits) defined in the application layer.
//!
//! ## Contents
//!
//! - **Calls**: the validated resolve / load / check descriptors
//! - **Value objects**: [`Locator`] and [`Timestamp`]
//! - **Errors**: configuration failures raised before any backend is touched

pub mod calls;
pub mod error;
pub mod value_objects;

pub use calls::{CallDescriptor, CallKind, FreshnessCheck, LoaderCalls};
pub use error::DomainError;
pub use value_objects::{Locator, Timestamp};
