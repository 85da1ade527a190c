//! Common error types for Eniguity

use thiserror::Error;

/// Common result type for Eniguity operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Eniguity services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts_and_displays() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "IO error: read-only");
    }

    #[test]
    fn test_message_variants_display() {
        assert_eq!(
            Error::Config("bad port".to_string()).to_string(),
            "Configuration error: bad port"
        );
        assert_eq!(Error::Internal("boom".to_string()).to_string(), "Internal error: boom");
    }
}
