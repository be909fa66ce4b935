// ============================================================================
// domain/error.rs - CONFIGURATION ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::calls::CallKind;

/// Root domain error type.
///
/// Domain errors are raised while building loader configuration, before any
/// backend is contacted. They are:
/// - Cloneable (config is rebuilt, not retried)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("{kind} call descriptor must not be blank")]
    BlankDescriptor { kind: CallKind },

    #[error("locator must not be empty")]
    EmptyLocator,

    #[error("no {kind} call is configured")]
    CallNotConfigured { kind: CallKind },

    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::BlankDescriptor { kind } => vec![
                format!("Configure the {kind} call, e.g. under [calls] in the config file"),
                "Only the check call may be left empty".into(),
            ],
            Self::EmptyLocator => vec![
                "Locators are produced by the resolve call; pass one returned by `find`".into(),
            ],
            Self::CallNotConfigured { kind } => {
                vec![format!("Set the {kind} call under [calls] in the config file")]
            }
            Self::InvalidTimestamp { .. } => {
                vec!["Timestamps are milliseconds since the Unix epoch".into()]
            }
        }
    }
}
