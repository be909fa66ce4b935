//! Driven port: the relational backend a loader talks to.
//!
//! A [`Connection`] prepares [call descriptors](CallDescriptor) into
//! reusable handles and executes them with one text input and one typed
//! output. The output types mirror the three call shapes:
//!
//! | Call    | Input          | Output                     |
//! |---------|----------------|----------------------------|
//! | resolve | template name  | [`OutParam::Text`]         |
//! | load    | locator        | [`OutParam::Characters`]   |
//! | check   | locator        | [`OutParam::Integer`]      |
//!
//! Implemented by:
//! - `dbsource_adapters::backend::PgConnection` (production)
//! - counting / scripted stubs in tests

use std::fmt;
use std::io::{self, Cursor, Read};

use thiserror::Error;

use crate::domain::CallDescriptor;

/// Error raised by a backend. Kept boxed so every adapter can surface its
/// native error type as the `source` of a [`LoaderError`].
///
/// [`LoaderError`]: crate::error::LoaderError
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Port for a single long-lived backend connection.
///
/// The loader owns the connection exclusively and calls it under one lock,
/// so implementations need `Send` but never `Sync`.
pub trait Connection: Send {
    /// A prepared, reusable call bound to this connection.
    type Handle: Send;

    /// Prepare `descriptor` on the backend.
    fn prepare_call(&mut self, descriptor: &CallDescriptor) -> Result<Self::Handle, BackendError>;

    /// Execute a prepared call with `input` bound to its only input
    /// parameter, returning its only output converted to `output`.
    fn execute(
        &mut self,
        handle: &mut Self::Handle,
        input: &str,
        output: OutParam,
    ) -> Result<OutValue, BackendError>;

    /// Release a prepared call on the backend.
    fn close_call(&mut self, handle: Self::Handle) -> Result<(), BackendError>;
}

// ── Output marshaling ─────────────────────────────────────────────────────────

/// Expected type of a call's output parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutParam {
    /// Short text, possibly null.
    Text,
    /// Large character object.
    Characters,
    /// 64-bit integer.
    Integer,
}

impl fmt::Display for OutParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Characters => "character",
            Self::Integer => "integer",
        })
    }
}

/// Value of a call's output parameter.
#[derive(Debug)]
pub enum OutValue {
    Text(Option<String>),
    Characters(Option<SourceReader>),
    Integer(Option<i64>),
}

impl OutValue {
    fn param(&self) -> OutParam {
        match self {
            Self::Text(_) => OutParam::Text,
            Self::Characters(_) => OutParam::Characters,
            Self::Integer(_) => OutParam::Integer,
        }
    }

    /// Text output; null stays `None`.
    pub fn into_text(self) -> Result<Option<String>, MarshalError> {
        match self {
            Self::Text(v) => Ok(v),
            other => Err(MarshalError::TypeMismatch {
                expected: OutParam::Text,
                actual: other.param(),
            }),
        }
    }

    /// Character output; null is an error.
    pub fn into_characters(self) -> Result<SourceReader, MarshalError> {
        match self {
            Self::Characters(Some(r)) => Ok(r),
            Self::Characters(None) => Err(MarshalError::NullOutput {
                expected: OutParam::Characters,
            }),
            other => Err(MarshalError::TypeMismatch {
                expected: OutParam::Characters,
                actual: other.param(),
            }),
        }
    }

    /// Integer output; null is an error.
    pub fn into_integer(self) -> Result<i64, MarshalError> {
        match self {
            Self::Integer(Some(v)) => Ok(v),
            Self::Integer(None) => Err(MarshalError::NullOutput {
                expected: OutParam::Integer,
            }),
            other => Err(MarshalError::TypeMismatch {
                expected: OutParam::Integer,
                actual: other.param(),
            }),
        }
    }
}

/// A call returned an output the loader cannot use.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarshalError {
    #[error("expected {expected} output, backend returned {actual}")]
    TypeMismatch { expected: OutParam, actual: OutParam },

    #[error("expected {expected} output, backend returned null")]
    NullOutput { expected: OutParam },
}

// ── SourceReader ──────────────────────────────────────────────────────────────

/// Character stream over a template's source.
///
/// Owns its own lifetime: the reader consumes it and drops it, the loader
/// keeps no reference.
pub struct SourceReader {
    inner: Box<dyn Read + Send>,
}

impl SourceReader {
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            inner: Box::new(reader),
        }
    }

    pub fn from_string(body: impl Into<String>) -> Self {
        Self::new(Cursor::new(body.into().into_bytes()))
    }

    /// Read the whole stream as UTF-8.
    pub fn into_string(mut self) -> io::Result<String> {
        let mut body = String::new();
        self.inner.read_to_string(&mut body)?;
        Ok(body)
    }
}

impl Read for SourceReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl fmt::Debug for SourceReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceReader").finish_non_exhaustive()
    }
}
