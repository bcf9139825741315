//! Status values reported by producers and streams.
//!
//! Nothing in this crate returns failures through control flow once a stream exists. Every
//! producer keeps a [`Status`] that callers query through `good()` and `status()`, and a
//! producer that left the normal state stays failed for the rest of its lifetime.

use std::io;

/// Module id carried by every [`ConditionTag`] raised in this crate.
pub const MODULE_ID: u16 = 1;

/// Result of querying a producer or stream: `Ok(())` is the normal state.
pub type Status = Result<(), StreamError>;

/// Severity of a tagged condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Informational, processing may continue.
    Warning,
    /// The operation failed and the producer is no longer usable.
    Error,
}

/// Machine-readable identity of a [`StreamError`]: originating module, numeric code and
/// severity. The message text is not part of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionTag {
    /// Id of the module that raised the condition.
    pub module: u16,
    /// Condition code, unique within the module.
    pub code: u16,
    /// Severity of the condition.
    pub severity: Severity,
}

/// Failure conditions a producer or stream can enter.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum StreamError {
    /// Opening, seeking or reading the underlying file failed.
    #[error("I/O error: {message}")]
    Io {
        /// Kind of the originating [`io::Error`].
        kind: io::ErrorKind,
        /// Human-readable description.
        message: String,
    },
    /// A putback requested more bytes than were consumed (or retained) so far.
    #[error("putback operation failed")]
    PutbackFailed,
    /// The stream already has a filter installed.
    #[error("a filter is already installed on this stream")]
    FilterAlreadyInstalled,
    /// Compressed input could not be decoded.
    #[error("inflate error: {0}")]
    Inflate(String),
}

impl StreamError {
    pub(crate) fn io(kind: io::ErrorKind, message: impl Into<String>) -> Self {
        Self::Io {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn from_io(error: &io::Error, context: &str) -> Self {
        Self::io(error.kind(), format!("{context}: {error}"))
    }

    /// Returns the tag identifying this condition.
    pub fn tag(&self) -> ConditionTag {
        let code = match self {
            Self::PutbackFailed => 17,
            Self::Io { .. } => 18,
            Self::FilterAlreadyInstalled => 19,
            Self::Inflate(_) => 20,
        };
        ConditionTag {
            module: MODULE_ID,
            code,
            severity: Severity::Error,
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(value: StreamError) -> Self {
        match value {
            StreamError::Io { kind, message } => io::Error::new(kind, message),
            StreamError::Inflate(_) => io::Error::new(io::ErrorKind::InvalidData, value),
            other => io::Error::other(other),
        }
    }
}
