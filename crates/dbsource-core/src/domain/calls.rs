//! Call descriptors: how each backend round-trip is invoked.
//!
//! A loader is configured with three descriptors. `resolve` and `load` are
//! mandatory; `check` is optional, and its absence is decided once, here,
//! as [`FreshnessCheck::Disabled`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

/// Descriptors longer than this are cut in diagnostic output.
pub const DISPLAY_LIMIT: usize = 100;

/// The three backend operations a loader performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Resolve,
    Load,
    Check,
}

impl CallKind {
    pub const ALL: [CallKind; 3] = [Self::Resolve, Self::Load, Self::Check];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Load => "load",
            Self::Check => "check",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Resolve => 0,
            Self::Load => 1,
            Self::Check => 2,
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CallDescriptor ────────────────────────────────────────────────────────────

/// Immutable text describing one backend invocation, e.g.
/// `SELECT template_api.find_template($1)`.
///
/// The loader never interprets it; the [`Connection`] prepares it.
///
/// [`Connection`]: crate::application::ports::Connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallDescriptor(String);

impl CallDescriptor {
    /// Build a descriptor for `kind`, rejecting blank text.
    pub fn new(kind: CallKind, text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::BlankDescriptor { kind });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-collapsed, truncated, quoted form used in diagnostics.
    pub fn abbreviated(&self) -> String {
        let collapsed = self.0.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() > DISPLAY_LIMIT {
            let cut: String = collapsed.chars().take(DISPLAY_LIMIT).collect();
            format!("\"{cut}...\"")
        } else {
            format!("\"{collapsed}\"")
        }
    }
}

impl fmt::Display for CallDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.abbreviated())
    }
}

// ── FreshnessCheck ────────────────────────────────────────────────────────────

/// Whether the loader can ask the backend for a source's timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreshnessCheck {
    /// No check call configured: every timestamp is "now".
    Disabled,
    Enabled(CallDescriptor),
}

impl FreshnessCheck {
    /// Blank or missing text disables checking.
    pub fn from_optional(text: Option<&str>) -> Self {
        match text {
            Some(t) if !t.trim().is_empty() => Self::Enabled(CallDescriptor(t.to_string())),
            _ => Self::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    pub fn descriptor(&self) -> Option<&CallDescriptor> {
        match self {
            Self::Enabled(d) => Some(d),
            Self::Disabled => None,
        }
    }
}

impl fmt::Display for FreshnessCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled(d) => d.fmt(f),
            Self::Disabled => f.write_str("null"),
        }
    }
}

// ── LoaderCalls ───────────────────────────────────────────────────────────────

/// The full, validated call configuration of one loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderCalls {
    pub resolve: CallDescriptor,
    pub load: CallDescriptor,
    pub check: FreshnessCheck,
}

impl LoaderCalls {
    pub fn new(
        resolve: impl Into<String>,
        load: impl Into<String>,
        check: Option<&str>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            resolve: CallDescriptor::new(CallKind::Resolve, resolve)?,
            load: CallDescriptor::new(CallKind::Load, load)?,
            check: FreshnessCheck::from_optional(check),
        })
    }

    /// Configuration with freshness checking disabled.
    pub fn without_check(
        resolve: impl Into<String>,
        load: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(resolve, load, None)
    }

    /// Descriptor for `kind`, `None` only for a disabled check.
    pub fn descriptor(&self, kind: CallKind) -> Option<&CallDescriptor> {
        match kind {
            CallKind::Resolve => Some(&self.resolve),
            CallKind::Load => Some(&self.load),
            CallKind::Check => self.check.descriptor(),
        }
    }
}

impl fmt::Display for LoaderCalls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resolve={}; load={}; check={}",
            self.resolve, self.load, self.check
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_resolve_is_rejected() {
        let err = LoaderCalls::new("  \n", "SELECT load($1)", None).unwrap_err();
        assert_eq!(
            err,
            DomainError::BlankDescriptor {
                kind: CallKind::Resolve
            }
        );
    }

    #[test]
    fn blank_load_is_rejected() {
        let err = LoaderCalls::new("SELECT find($1)", "", None).unwrap_err();
        assert!(matches!(
            err,
            DomainError::BlankDescriptor {
                kind: CallKind::Load
            }
        ));
    }

    #[test]
    fn blank_check_disables_freshness() {
        let calls = LoaderCalls::new("SELECT find($1)", "SELECT load($1)", Some("   ")).unwrap();
        assert_eq!(calls.check, FreshnessCheck::Disabled);
        assert!(calls.descriptor(CallKind::Check).is_none());
    }

    #[test]
    fn present_check_is_enabled() {
        let calls =
            LoaderCalls::new("SELECT find($1)", "SELECT load($1)", Some("SELECT ts($1)")).unwrap();
        assert!(calls.check.is_enabled());
        assert_eq!(
            calls.descriptor(CallKind::Check).map(|d| d.as_str()),
            Some("SELECT ts($1)")
        );
    }

    #[test]
    fn abbreviated_collapses_whitespace() {
        let d = CallDescriptor::new(CallKind::Load, "  SELECT\n\t load(\n$1)  ").unwrap();
        assert_eq!(d.abbreviated(), "\"SELECT load( $1)\"");
    }

    #[test]
    fn abbreviated_truncates_long_text() {
        let long = format!("SELECT {}", "x".repeat(200));
        let d = CallDescriptor::new(CallKind::Resolve, long).unwrap();
        let s = d.abbreviated();
        assert!(s.ends_with("...\""));
        // quotes + limit + ellipsis
        assert_eq!(s.chars().count(), DISPLAY_LIMIT + 5);
    }

    #[test]
    fn display_renders_disabled_check_as_null() {
        let calls = LoaderCalls::without_check("SELECT find($1)", "SELECT load($1)").unwrap();
        assert_eq!(
            calls.to_string(),
            "resolve=\"SELECT find($1)\"; load=\"SELECT load($1)\"; check=null"
        );
    }

    #[test]
    fn display_quotes_enabled_check() {
        let calls = LoaderCalls::new("a", "b", Some("c")).unwrap();
        assert!(calls.to_string().ends_with("check=\"c\""));
    }
}
