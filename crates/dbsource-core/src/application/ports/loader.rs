//! The resource-loader contract a templating engine consumes.

use crate::application::ports::SourceReader;
use crate::domain::{Locator, Timestamp};
use crate::error::LoaderResult;

/// Port for pluggable template sources.
///
/// Implemented by:
/// - [`DatabaseTemplateLoader`](crate::application::DatabaseTemplateLoader) (production)
/// - `dbsource_adapters::InMemoryTemplateSource` (testing, demos)
///
/// ## Contract
///
/// - A locator returned by `find` is only passed back to the same loader.
/// - `close` is called once per successful `find`, after the engine is done
///   with the locator.
/// - `reset` drops all internal state before the engine reloads; it never
///   fails.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateSourceLoader: Send + Sync {
    /// Resolve `name` to a locator, `None` if no such template exists.
    fn find(&self, name: &str) -> LoaderResult<Option<Locator>>;

    /// Last-modification time of the source at `locator`.
    fn last_modified(&self, locator: &Locator) -> LoaderResult<Timestamp>;

    /// Open the source text at `locator`.
    fn read(&self, locator: &Locator) -> LoaderResult<SourceReader>;

    /// Release whatever `find` acquired for `locator`.
    fn close(&self, locator: &Locator) -> LoaderResult<()>;

    /// Drop all cached internal state.
    fn reset(&self);
}
