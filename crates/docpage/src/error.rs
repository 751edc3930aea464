//! Error types for paginated query execution.
//!
//! Every failure surfaced by this crate and by engine implementations is an
//! [`Error`] carrying an [`ErrorKind`], an optional message and an optional
//! source error. Store-level errors are passed through unchanged; the
//! query builder never retries.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Engine implementations use this to attach driver errors as the source of
/// an [`Error`] without this crate depending on the driver.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for all paginated query operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while executing a paginated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The store is unreachable or the connection failed mid-query.
    Connectivity,
    /// The deadline attached to the query, or a server-side time limit, expired.
    Timeout,
    /// The cancellation token attached to the query fired.
    Cancelled,
    /// The filter predicate or aggregation pipeline was rejected.
    InvalidQuery,
    /// A document could not be decoded into the target record type.
    Decode,
    /// The engine configuration is invalid.
    Configuration,
    /// The engine returned an unexpected response.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connectivity => write!(f, "Store connectivity error"),
            Self::Timeout => write!(f, "Query timed out"),
            Self::Cancelled => write!(f, "Query cancelled"),
            Self::InvalidQuery => write!(f, "Invalid query"),
            Self::Decode => write!(f, "Document decode error"),
            Self::Configuration => write!(f, "Configuration error"),
            Self::Internal => write!(f, "Internal engine error"),
        }
    }
}

/// A structured error type for paginated query operations.
#[derive(Debug, Error)]
#[error("{}", .message.as_ref().map(|m| format!("{}: {}", .kind, m)).unwrap_or_else(|| .kind.to_string()))]
#[must_use = "query errors should be handled appropriately"]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Creates a new connectivity error.
    pub fn connectivity() -> Self {
        Self::new(ErrorKind::Connectivity)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new cancellation error.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    /// Creates a new invalid query error.
    pub fn invalid_query() -> Self {
        Self::new(ErrorKind::InvalidQuery)
    }

    /// Creates a new decode error.
    pub fn decode() -> Self {
        Self::new(ErrorKind::Decode)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new internal error.
    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns true if the store could not be reached or the query scope ended.
    ///
    /// Timeouts and cancellations are grouped with connectivity failures:
    /// all three abort the call before any record is decoded.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Connectivity | ErrorKind::Timeout | ErrorKind::Cancelled
        )
    }

    /// Returns true if repeating the same query might succeed.
    ///
    /// Retrying is left to callers; nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Connectivity | ErrorKind::Timeout)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::decode()
            .with_message(error.to_string())
            .with_source(error)
    }
}
