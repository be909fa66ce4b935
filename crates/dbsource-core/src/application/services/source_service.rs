//! Template Source Service - what a templating engine does with a loader.
//!
//! Runs the engine-side pipeline for one template (find, check, read,
//! close) and applies the error policy:
//!
//! - resolution and load failures make *that* template unavailable
//! - a failed freshness check aborts the pipeline with an error

use tracing::{instrument, warn};

use crate::{
    application::ports::TemplateSourceLoader,
    domain::{Locator, Timestamp},
    error::{LoaderError, LoaderResult},
};

/// A template source read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub name: String,
    pub locator: Locator,
    pub last_modified: Timestamp,
    pub body: String,
}

/// Outcome of looking up one template.
#[derive(Debug)]
pub enum SourceLookup {
    Found(LoadedSource),
    NotFound,
    /// The template exists or might exist, but could not be resolved or
    /// loaded. Other templates are unaffected.
    Unavailable(LoaderError),
}

impl SourceLookup {
    pub fn found(self) -> Option<LoadedSource> {
        match self {
            Self::Found(source) => Some(source),
            _ => None,
        }
    }
}

/// Service for fetching template sources.
pub struct TemplateSourceService {
    loader: Box<dyn TemplateSourceLoader>,
}

impl TemplateSourceService {
    /// Create a new template source service.
    pub fn new(loader: Box<dyn TemplateSourceLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &dyn TemplateSourceLoader {
        self.loader.as_ref()
    }

    /// Find a template and read its source.
    #[instrument(skip(self))]
    pub fn fetch(&self, name: &str) -> LoaderResult<SourceLookup> {
        let locator = match self.loader.find(name) {
            Ok(Some(locator)) => locator,
            Ok(None) => return Ok(SourceLookup::NotFound),
            Err(e) => return Self::unavailable(e),
        };

        let outcome = self.load_located(name, &locator);

        if let Err(e) = self.loader.close(&locator) {
            warn!(%locator, error = %e, "failed to close template source");
        }
        outcome
    }

    /// Whether the source at `locator` changed since the engine last saw
    /// it at `since`.
    pub fn is_stale(&self, locator: &Locator, since: Timestamp) -> LoaderResult<bool> {
        Ok(self.loader.last_modified(locator)? != since)
    }

    /// Drop all loader state.
    pub fn reset(&self) {
        self.loader.reset();
    }

    fn load_located(&self, name: &str, locator: &Locator) -> LoaderResult<SourceLookup> {
        let last_modified = self.loader.last_modified(locator)?;

        let reader = match self.loader.read(locator) {
            Ok(reader) => reader,
            Err(e) => return Self::unavailable(e),
        };

        let body = match reader.into_string() {
            Ok(body) => body,
            Err(e) => {
                return Self::unavailable(LoaderError::Load {
                    locator: locator.clone(),
                    source: Box::new(e),
                });
            }
        };

        Ok(SourceLookup::Found(LoadedSource {
            name: name.to_string(),
            locator: locator.clone(),
            last_modified,
            body,
        }))
    }

    fn unavailable(err: LoaderError) -> LoaderResult<SourceLookup> {
        if err.is_template_local() {
            warn!(error = %err, "template unavailable");
            Ok(SourceLookup::Unavailable(err))
        } else {
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockTemplateSourceLoader, SourceReader};
    use mockall::predicate::eq;
    use std::io;

    fn loc(s: &str) -> Locator {
        Locator::new(s).unwrap()
    }

    fn backend(msg: &str) -> crate::application::ports::BackendError {
        Box::new(io::Error::other(msg.to_string()))
    }

    #[test]
    fn fetch_runs_full_pipeline_and_closes() {
        let mut mock = MockTemplateSourceLoader::new();
        mock.expect_find()
            .with(eq("greet"))
            .times(1)
            .returning(|_| Ok(Some(loc("loc://greet"))));
        mock.expect_last_modified()
            .times(1)
            .returning(|_| Ok(Timestamp::from_millis(7)));
        mock.expect_read()
            .times(1)
            .returning(|_| Ok(SourceReader::from_string("Hello, ${name}!")));
        mock.expect_close()
            .with(eq(loc("loc://greet")))
            .times(1)
            .returning(|_| Ok(()));

        let service = TemplateSourceService::new(Box::new(mock));
        let source = service.fetch("greet").unwrap().found().unwrap();

        assert_eq!(source.body, "Hello, ${name}!");
        assert_eq!(source.last_modified, Timestamp::from_millis(7));
        assert_eq!(source.locator, loc("loc://greet"));
    }

    #[test]
    fn missing_template_is_not_found() {
        let mut mock = MockTemplateSourceLoader::new();
        mock.expect_find().returning(|_| Ok(None));
        mock.expect_close().never();

        let service = TemplateSourceService::new(Box::new(mock));
        assert!(matches!(
            service.fetch("nope").unwrap(),
            SourceLookup::NotFound
        ));
    }

    #[test]
    fn resolution_failure_is_unavailable() {
        let mut mock = MockTemplateSourceLoader::new();
        mock.expect_find().returning(|name| {
            Err(LoaderError::Resolution {
                name: name.to_string(),
                source: backend("db down"),
            })
        });

        let service = TemplateSourceService::new(Box::new(mock));
        match service.fetch("broken").unwrap() {
            SourceLookup::Unavailable(LoaderError::Resolution { name, .. }) => {
                assert_eq!(name, "broken")
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn load_failure_is_unavailable_and_still_closes() {
        let mut mock = MockTemplateSourceLoader::new();
        mock.expect_find().returning(|_| Ok(Some(loc("loc://a"))));
        mock.expect_last_modified()
            .returning(|_| Ok(Timestamp::from_millis(1)));
        mock.expect_read().returning(|l| {
            Err(LoaderError::Load {
                locator: l.clone(),
                source: backend("lob gone"),
            })
        });
        mock.expect_close().times(1).returning(|_| Ok(()));

        let service = TemplateSourceService::new(Box::new(mock));
        assert!(matches!(
            service.fetch("a").unwrap(),
            SourceLookup::Unavailable(LoaderError::Load { .. })
        ));
    }

    #[test]
    fn freshness_failure_aborts_and_still_closes() {
        let mut mock = MockTemplateSourceLoader::new();
        mock.expect_find().returning(|_| Ok(Some(loc("loc://a"))));
        mock.expect_last_modified().returning(|l| {
            Err(LoaderError::FreshnessCheck {
                locator: l.clone(),
                source: backend("bad checker"),
            })
        });
        mock.expect_read().never();
        mock.expect_close().times(1).returning(|_| Ok(()));

        let service = TemplateSourceService::new(Box::new(mock));
        let err = service.fetch("a").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn is_stale_compares_timestamps() {
        let mut mock = MockTemplateSourceLoader::new();
        mock.expect_last_modified()
            .returning(|_| Ok(Timestamp::from_millis(100)));

        let service = TemplateSourceService::new(Box::new(mock));
        let l = loc("loc://a");
        assert!(!service.is_stale(&l, Timestamp::from_millis(100)).unwrap());
        assert!(service.is_stale(&l, Timestamp::from_millis(99)).unwrap());
    }

    #[test]
    fn reset_delegates() {
        let mut mock = MockTemplateSourceLoader::new();
        mock.expect_reset().times(1).return_const(());

        TemplateSourceService::new(Box::new(mock)).reset();
    }
}
