//! Error handling for ZephrKit
//!
//! Provides error types for the layers of the toolkit:
//! - Source errors (SDK session establishment, permission gating)
//! - A unified error type for public APIs
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Source error type
///
/// Represents failures at the boundary to the location SDK: establishing a
/// session, the OS capability gate, and session state violations.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// A required OS capability is not granted
    ///
    /// Never retried automatically; the caller must obtain the capability
    /// and call `start` again.
    #[error("Required permission not granted: {capability}")]
    PermissionDenied {
        /// The missing capability name.
        capability: String,
    },

    /// The SDK session could not be established
    #[error("Failed to establish session: {reason}")]
    ConnectionFailed {
        /// The reason the session could not be established.
        reason: String,
    },

    /// A session already exists for this source
    #[error("Source already started")]
    AlreadyStarted,

    /// Generic source error
    #[error("Source error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Main error type for ZephrKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Source error
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a permission failure
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Error::Source(SourceError::PermissionDenied { .. }))
    }

    /// Check if this is a source error
    pub fn is_source_error(&self) -> bool {
        matches!(self, Error::Source(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
