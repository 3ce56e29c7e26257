//! Error types for xata-auth.
//!
//! Error messages never include key material.

/// Result type alias for xata-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for xata-auth operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// No source in the chain produced a key.
    #[error("No Xata API key found (tried: {0})")]
    NotFound(String),

    /// A key was found but is unusable.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// A credential file exists but could not be read.
    #[error("IO error: {0}")]
    Io(String),

    /// A credential file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<Error> for xata_client::Error {
    fn from(err: Error) -> Self {
        let message = err.kind.to_string();
        xata_client::Error::with_source(xata_client::ErrorKind::Config(message), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        let err = ErrorKind::NotFound("XATA_API_KEY, .env".to_string());
        assert_eq!(
            err.to_string(),
            "No Xata API key found (tried: XATA_API_KEY, .env)"
        );
    }

    #[test]
    fn test_converts_into_client_config_error() {
        let err: xata_client::Error =
            Error::new(ErrorKind::InvalidCredentials("empty key".to_string())).into();
        assert!(matches!(err.kind, xata_client::ErrorKind::Config(_)));
        assert!(err.to_string().contains("empty key"));
    }
}
