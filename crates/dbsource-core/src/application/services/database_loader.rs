//! Database Template Loader - template sources served by backend calls.
//!
//! Three configurable calls back the loader contract:
//!
//! - **resolve** finds a template by name and returns its [`Locator`]
//! - **load** returns the source text for a locator
//! - **check** returns the timestamp for a locator (optional)
//!
//! Each call is prepared lazily on the shared connection and cached. Every
//! round-trip, handle creation and invalidation happens under one mutex, so
//! the connection never sees two statements at once.
//!
//! With no check call configured, [`last_modified`] returns the current
//! time without contacting the backend, which makes every source look
//! changed whenever the engine samples it.
//!
//! [`last_modified`]: TemplateSourceLoader::last_modified

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, instrument};

use crate::application::handle_cache::HandleCache;
use crate::application::ports::{
    BackendError, Connection, MarshalError, OutParam, OutValue, SourceReader,
    TemplateSourceLoader,
};
use crate::domain::{CallKind, LoaderCalls, Locator, Timestamp};
use crate::error::{LoaderError, LoaderResult};

/// Everything the loader mutates, guarded together.
struct LoaderState<C: Connection> {
    connection: C,
    handles: HandleCache<C::Handle>,
}

/// [`TemplateSourceLoader`] backed by one database connection.
///
/// A call whose handle fails stays cached: the loader never evicts on its
/// own. Call [`reset`](TemplateSourceLoader::reset) after the connection has
/// been re-established to force every call to be prepared again.
pub struct DatabaseTemplateLoader<C: Connection> {
    calls: LoaderCalls,
    state: Mutex<LoaderState<C>>,
}

impl<C: Connection> DatabaseTemplateLoader<C> {
    /// Create a loader owning `connection`.
    pub fn new(connection: C, calls: LoaderCalls) -> Self {
        Self {
            calls,
            state: Mutex::new(LoaderState {
                connection,
                handles: HandleCache::new(),
            }),
        }
    }

    /// Create a loader over a connection obtained from `factory`.
    pub fn connect<F>(calls: LoaderCalls, factory: F) -> LoaderResult<Self>
    where
        F: FnOnce() -> Result<C, BackendError>,
    {
        let connection = factory().map_err(|source| LoaderError::Connection { source })?;
        Ok(Self::new(connection, calls))
    }

    pub fn calls(&self) -> &LoaderCalls {
        &self.calls
    }

    pub fn freshness_check_enabled(&self) -> bool {
        self.calls.check.is_enabled()
    }

    /// Whether the call for `kind` is currently prepared.
    pub fn is_prepared(&self, kind: CallKind) -> bool {
        self.lock_recovering().handles.is_prepared(kind)
    }

    /// Handles prepared since the loader was created, including ones
    /// dropped by resets.
    pub fn handles_created(&self) -> u64 {
        self.lock_recovering().handles.created_total()
    }

    fn lock_recovering(&self) -> std::sync::MutexGuard<'_, LoaderState<C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One backend round-trip under the lock.
    fn round_trip<T, W>(
        &self,
        kind: CallKind,
        input: &str,
        output: OutParam,
        extract: fn(OutValue) -> Result<T, MarshalError>,
        wrap: W,
    ) -> LoaderResult<T>
    where
        W: FnOnce(BackendError) -> LoaderError,
    {
        let mut state = self
            .state
            .lock()
            .map_err(|_| LoaderError::LockPoisoned { kind })?;

        Self::execute_locked(&mut state, &self.calls, kind, input, output)
            .and_then(|value| extract(value).map_err(BackendError::from))
            .map_err(wrap)
    }

    fn execute_locked(
        state: &mut LoaderState<C>,
        calls: &LoaderCalls,
        kind: CallKind,
        input: &str,
        output: OutParam,
    ) -> Result<OutValue, BackendError> {
        let LoaderState {
            connection,
            handles,
        } = state;
        let handle = handles.get_or_create(&mut *connection, calls, kind)?;
        debug!(%kind, input, "executing call");
        connection.execute(handle, input, output)
    }
}

impl<C: Connection> TemplateSourceLoader for DatabaseTemplateLoader<C> {
    #[instrument(skip(self))]
    fn find(&self, name: &str) -> LoaderResult<Option<Locator>> {
        let text = self.round_trip(
            CallKind::Resolve,
            name,
            OutParam::Text,
            OutValue::into_text,
            |source| LoaderError::Resolution {
                name: name.to_string(),
                source,
            },
        )?;

        // null or empty output: no such template
        Ok(text.filter(|t| !t.is_empty()).map(Locator::new).transpose()?)
    }

    #[instrument(skip(self, locator), fields(locator = %locator))]
    fn last_modified(&self, locator: &Locator) -> LoaderResult<Timestamp> {
        if !self.freshness_check_enabled() {
            return Ok(Timestamp::now());
        }

        let millis = self.round_trip(
            CallKind::Check,
            locator.as_str(),
            OutParam::Integer,
            OutValue::into_integer,
            |source| LoaderError::FreshnessCheck {
                locator: locator.clone(),
                source,
            },
        )?;
        Ok(Timestamp::from_millis(millis))
    }

    #[instrument(skip(self, locator), fields(locator = %locator))]
    fn read(&self, locator: &Locator) -> LoaderResult<SourceReader> {
        self.round_trip(
            CallKind::Load,
            locator.as_str(),
            OutParam::Characters,
            OutValue::into_characters,
            |source| LoaderError::Load {
                locator: locator.clone(),
                source,
            },
        )
    }

    fn close(&self, _locator: &Locator) -> LoaderResult<()> {
        Ok(())
    }

    #[instrument(skip(self))]
    fn reset(&self) {
        let mut state = self.lock_recovering();
        let LoaderState {
            connection,
            handles,
        } = &mut *state;
        let dropped = handles.invalidate_all(connection);
        drop(state);
        self.state.clear_poison();
        info!(dropped, "loader state reset");
    }
}

impl<C: Connection> Drop for DatabaseTemplateLoader<C> {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        let dropped = state.handles.invalidate_all(&mut state.connection);
        debug!(dropped, "loader dropped");
    }
}

impl<C: Connection> fmt::Display for DatabaseTemplateLoader<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatabaseTemplateLoader({})", self.calls)
    }
}

impl<C: Connection> fmt::Debug for DatabaseTemplateLoader<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseTemplateLoader")
            .field("calls", &self.calls)
            .finish_non_exhaustive()
    }
}
