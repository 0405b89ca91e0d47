//! Service layer error types and utilities.
//!
//! This module provides error handling for the bootstrap and service layer with:
//!
//! - Strongly-typed error kinds for different failure categories
//! - Builder pattern for ergonomic error construction
//! - Type-safe error source tracking with boxed trait objects
//! - Integration with `thiserror` for automatic `Display` and `Error` trait implementations

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use avicena_object::StorageError;
use avicena_postgres::PgError;

/// Type alias for boxed errors that are Send + Sync.
///
/// This is the standard error boxing type used throughout the service layer
/// for error sources. Using a type alias ensures consistency and reduces
/// verbosity in error type signatures.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
///
/// This is a convenience alias that uses [`Error`] as the error type,
/// reducing boilerplate in function signatures throughout the service layer.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error kind enumeration for categorizing service layer errors.
///
/// This enum represents the different categories of errors that can occur
/// while bootstrapping or operating the service. It's separated from
/// [`Error`] to allow for pattern matching on error types without accessing
/// the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Configuration-related errors.
    Config,
    /// Database connectivity and migration errors.
    Database,
    /// Object storage errors.
    Storage,
    /// Internal service logic errors.
    Internal,
}

impl ErrorKind {
    /// Returns the error kind as a string for categorization.
    ///
    /// Useful for logging or error categorization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Database => "database",
            Self::Storage => "object_storage",
            Self::Internal => "internal_service",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service layer error with structured information.
///
/// This structure provides comprehensive error information including:
///
/// - Error kind for categorization
/// - Human-readable message
/// - Optional source error for error chaining
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    /// The error category/type
    kind: ErrorKind,
    /// Human-readable error message
    message: Cow<'static, str>,
    /// Optional underlying error that caused this error
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    /// Creates a new [`Error`].
    #[inline]
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source error to this error, enabling error chain tracking.
    ///
    /// This method consumes the error and returns a new one with the source attached.
    /// It follows the builder pattern for ergonomic error construction.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creates a new configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Creates a new database error.
    #[inline]
    pub fn database(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Creates a new object storage error.
    #[inline]
    pub fn storage(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Creates a new internal service error.
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl From<PgError> for Error {
    fn from(err: PgError) -> Self {
        Error::database(err.to_string()).with_source(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::storage(err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = Error::config("invalid configuration");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "invalid configuration");
    }

    #[test]
    fn test_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "socket closed");
        let error = Error::database("cannot reach database").with_source(source);

        assert!(StdError::source(&error).is_some());
        assert_eq!(error.kind(), ErrorKind::Database);
    }

    #[test]
    fn test_error_from_pg_error() {
        let error = Error::from(PgError::Config("invalid pool size".into()));

        assert_eq!(error.kind(), ErrorKind::Database);
        assert!(error.to_string().contains("database"));
    }

    #[test]
    fn test_error_from_storage_error() {
        let error = Error::from(StorageError::config("bucket name is empty"));

        assert_eq!(error.kind(), ErrorKind::Storage);
        assert!(StdError::source(&error).is_some());
    }

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::Config.as_str(), "config");
        assert_eq!(ErrorKind::Database.as_str(), "database");
        assert_eq!(ErrorKind::Storage.as_str(), "object_storage");
        assert_eq!(ErrorKind::Internal.as_str(), "internal_service");
    }
}
