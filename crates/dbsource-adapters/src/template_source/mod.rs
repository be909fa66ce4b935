//! Template sources that do not need a database.

mod memory;

pub use memory::{InMemoryTemplateSource, LOCATOR_PREFIX};
