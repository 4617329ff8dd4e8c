//! Error types for document store operations.
//!
//! Store errors are never retried or rewritten by the query layer; they
//! reach the caller with the variant the backend produced.

use std::fmt;
use thiserror::Error;

/// The unified error type for store and query operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport errors (connection, timeout, local IO).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The remote store answered with an error status.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (bad store URL, document id, malformed document).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// The addressed document does not exist.
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },
}

impl Error {
    /// Create a not-found error for a document.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Returns true if this error reports a missing document.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the store failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Local filesystem error.
    #[error("IO error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::Io {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// An error status returned by a remote store.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Canonical error status (e.g. `INVALID_ARGUMENT`), if present.
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if the store rejected the request's credentials.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
            || self.status == 403
            || self.error.as_deref() == Some("UNAUTHENTICATED")
            || self.error.as_deref() == Some("PERMISSION_DENIED")
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid store URL.
    #[error("invalid store URL '{value}': {reason}")]
    StoreUrl { value: String, reason: String },

    /// Invalid collection or document identifier.
    #[error("invalid identifier '{value}': {reason}")]
    Identifier { value: String, reason: String },

    /// A stored or received document could not be decoded.
    #[error("malformed document: {message}")]
    Document { message: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

impl From<serde_json::Error> for InvalidInputError {
    fn from(err: serde_json::Error) -> Self {
        InvalidInputError::Document {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidInput(InvalidInputError::from(err))
    }
}
