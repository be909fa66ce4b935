//! In-memory template source.

use std::{
    collections::HashMap,
    io,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use dbsource_core::{
    application::ports::{SourceReader, TemplateSourceLoader},
    domain::{Locator, Timestamp},
    error::{LoaderError, LoaderResult},
};
use tracing::debug;

/// Prefix of every locator handed out by [`InMemoryTemplateSource`].
pub const LOCATOR_PREFIX: &str = "mem:";

#[derive(Debug, Clone)]
struct Entry {
    body: String,
    last_modified: Timestamp,
}

/// Thread-safe in-memory template source.
///
/// Clones share the same map, so a test can keep a handle for `insert` and
/// `touch` while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateSource {
    inner: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryTemplateSource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding `templates`, all stamped now.
    pub fn with_templates<I, N, B>(templates: I) -> Self
    where
        I: IntoIterator<Item = (N, B)>,
        N: Into<String>,
        B: Into<String>,
    {
        let source = Self::new();
        for (name, body) in templates {
            source.insert(name, body);
        }
        source
    }

    /// Insert or replace a template, stamping it with the current time.
    pub fn insert(&self, name: impl Into<String>, body: impl Into<String>) {
        let entry = Entry {
            body: body.into(),
            last_modified: Timestamp::now(),
        };
        self.write().insert(name.into(), entry);
    }

    /// Insert a template with an explicit timestamp.
    pub fn insert_at(&self, name: impl Into<String>, body: impl Into<String>, at: Timestamp) {
        let entry = Entry {
            body: body.into(),
            last_modified: at,
        };
        self.write().insert(name.into(), entry);
    }

    /// Refresh a template's timestamp. Returns `false` if it does not exist.
    pub fn touch(&self, name: &str) -> bool {
        match self.write().get_mut(name) {
            Some(entry) => {
                entry.last_modified = Timestamp::now();
                true
            }
            None => false,
        }
    }

    /// Remove a template. Returns `false` if it did not exist.
    pub fn remove(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }

    /// Get the number of templates.
    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    /// Check if source is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all templates.
    pub fn clear(&self) {
        self.write().clear();
    }

    // The map is never left half-updated, so a poisoned lock is safe to reuse.
    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn name_of(locator: &Locator) -> Option<&str> {
    locator.as_str().strip_prefix(LOCATOR_PREFIX)
}

fn not_found(locator: &Locator) -> LoaderError {
    LoaderError::Load {
        locator: locator.clone(),
        source: Box::new(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no in-memory template at {locator}"),
        )),
    }
}

impl TemplateSourceLoader for InMemoryTemplateSource {
    fn find(&self, name: &str) -> LoaderResult<Option<Locator>> {
        if !self.read_map().contains_key(name) {
            return Ok(None);
        }
        Ok(Some(Locator::new(format!("{LOCATOR_PREFIX}{name}"))?))
    }

    /// A template removed since `find` reports the current time, so the
    /// engine reloads it and gets the not-found error from `read`.
    fn last_modified(&self, locator: &Locator) -> LoaderResult<Timestamp> {
        let stamp = name_of(locator)
            .and_then(|name| self.read_map().get(name).map(|e| e.last_modified));
        Ok(stamp.unwrap_or_else(Timestamp::now))
    }

    fn read(&self, locator: &Locator) -> LoaderResult<SourceReader> {
        let body = name_of(locator)
            .and_then(|name| self.read_map().get(name).map(|e| e.body.clone()))
            .ok_or_else(|| not_found(locator))?;
        Ok(SourceReader::from_string(body))
    }

    fn close(&self, _locator: &Locator) -> LoaderResult<()> {
        Ok(())
    }

    fn reset(&self) {
        debug!("in-memory template source has no cached state to reset");
    }
}
