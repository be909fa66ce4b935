//! Unified error handling for dbsource core.
//!
//! [`LoaderError`] separates the three places a template pipeline can fail
//! (resolve, freshness check, load) so the engine can tell a missing or
//! unreachable template apart from a broken freshness check.

use thiserror::Error;

use crate::application::ports::BackendError;
use crate::domain::{CallKind, DomainError, Locator};

/// Root error type for loader operations.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The resolve call failed or returned something other than text.
    ///
    /// Recoverable: other templates may still resolve.
    #[error("Unable to find template named {name}")]
    Resolution {
        name: String,
        #[source]
        source: BackendError,
    },

    /// The load call failed.
    ///
    /// Recoverable per template.
    #[error("Unable to load template at {locator}")]
    Load {
        locator: Locator,
        #[source]
        source: BackendError,
    },

    /// The check call failed.
    ///
    /// Fatal: a broken freshness check undermines the engine's cache, so the
    /// current load attempt must abort.
    #[error("Unable to check timestamp for template at {locator}")]
    FreshnessCheck {
        locator: Locator,
        #[source]
        source: BackendError,
    },

    /// The connection factory failed.
    #[error("Unable to acquire a backend connection")]
    Connection {
        #[source]
        source: BackendError,
    },

    /// Invalid loader configuration.
    #[error("Configuration error: {0}")]
    Domain(#[from] DomainError),

    /// A previous holder of the loader lock panicked mid-call.
    #[error("Loader state is poisoned; a previous {kind} call panicked")]
    LockPoisoned { kind: CallKind },
}

impl LoaderError {
    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Resolution { .. } => ErrorCategory::NotFound,
            Self::Load { .. } => ErrorCategory::Unavailable,
            Self::FreshnessCheck { .. } => ErrorCategory::Fatal,
            Self::Connection { .. } | Self::Domain(_) => ErrorCategory::Configuration,
            Self::LockPoisoned { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether this error must abort the current load pipeline rather than
    /// being reported as "template unavailable".
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FreshnessCheck { .. })
    }

    /// Whether this error affects only the template it was raised for.
    pub fn is_template_local(&self) -> bool {
        matches!(self, Self::Resolution { .. } | Self::Load { .. })
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Resolution { name, .. } => vec![
                format!("Check that a template named '{name}' exists in the database"),
                "Verify the resolve call and its permissions".into(),
            ],
            Self::Load { .. } => vec![
                "Verify the load call returns exactly one character column".into(),
                "If the connection was reset, reset the loader to re-prepare its calls".into(),
            ],
            Self::FreshnessCheck { .. } => vec![
                "The check call must return one 64-bit integer".into(),
                "Remove the check call to disable freshness checking".into(),
            ],
            Self::Connection { .. } => vec![
                "Check the database URL (--database-url or DATABASE_URL)".into(),
                "Ensure the database server is reachable".into(),
            ],
            Self::Domain(e) => e.suggestions(),
            Self::LockPoisoned { .. } => vec![
                "A previous call panicked while holding the loader".into(),
                "Create a new loader".into(),
            ],
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Unavailable,
    Fatal,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type LoaderResult<T> = Result<T, LoaderError>;
