//! Error types for storage operations.

use std::fmt;

use thiserror::Error;

/// The category of a store error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorCode {
    /// A uniqueness constraint was violated, e.g. two bookings racing for
    /// the same `(calendar, start instant)` key. Retry after re-reading.
    Conflict,
    /// The backing store could not be reached.
    ConnectionFailed,
    /// A stored row could not be decoded.
    Corrupted,
    /// Unexpected internal state.
    Internal,
}

impl StoreErrorCode {
    /// Returns true if the operation may be retried.
    ///
    /// A conflict means another writer won a race; re-reading the
    /// snapshot and retrying is the documented recovery path.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict | Self::ConnectionFailed)
    }

    /// A stable name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::ConnectionFailed => "connection_failed",
            Self::Corrupted => "corrupted",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error from the storage collaborator.
#[derive(Debug, Error)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Creates a new store error.
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Conflict, message)
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::ConnectionFailed, message)
    }

    /// Creates a corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Corrupted, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Internal, message)
    }

    /// Attaches an underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// The error code.
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the operation may be retried.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_retryable() {
        assert!(StoreErrorCode::Conflict.is_retryable());
        assert!(StoreErrorCode::ConnectionFailed.is_retryable());
        assert!(!StoreErrorCode::Corrupted.is_retryable());
        assert!(!StoreErrorCode::Internal.is_retryable());
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = StoreError::conflict("appointment instant already taken");
        let display = err.to_string();
        assert!(display.contains("conflict"));
        assert!(display.contains("already taken"));
    }

    #[test]
    fn source_is_preserved() {
        use std::error::Error;
        let io = std::io::Error::other("disk full");
        let err = StoreError::internal("write failed").with_source(io);
        assert!(err.source().is_some());
        assert_eq!(err.code(), StoreErrorCode::Internal);
    }
}
