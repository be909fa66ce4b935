//! Relational backends.

pub mod postgres;

pub use self::postgres::{PgBackendError, PgConnection};
