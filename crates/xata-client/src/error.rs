//! Error types for xata-client, including the status-to-error mapper.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Result type alias for xata-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for xata-client operations.
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

    /// Shorthand for a usage error naming the identifier that could not be resolved.
    pub fn missing(identifier: Identifier) -> Self {
        Self::new(ErrorKind::MissingIdentifier(identifier))
    }

    /// HTTP status code of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        self.kind.status()
    }

    /// Structured error body for documented API errors.
    pub fn api_body(&self) -> Option<&ApiErrorBody> {
        self.kind.api_body()
    }

    /// Raw response text for API errors that were not decoded.
    pub fn raw_body(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Api { body, .. } | ErrorKind::ErrorBodyDecode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns true if this error was raised before any network I/O.
    pub fn is_usage_error(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingIdentifier(_))
    }

    /// Returns true if the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// A multi-part resource identifier that may come from a call site or a client default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identifier {
    Workspace,
    Region,
    Database,
    Branch,
    Table,
    Record,
    Column,
    File,
    ApiKey,
}

impl Identifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Identifier::Workspace => "workspace id",
            Identifier::Region => "region",
            Identifier::Database => "database name",
            Identifier::Branch => "branch name",
            Identifier::Table => "table name",
            Identifier::Record => "record id",
            Identifier::Column => "column name",
            Identifier::File => "file id",
            Identifier::ApiKey => "API key name",
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error body returned by the API for documented status codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Server-side error identifier, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human readable message.
    pub message: String,
    /// HTTP status of the response the body arrived with.
    #[serde(default)]
    pub status: u16,
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// A required identifier was set neither on the request nor as a client default.
    #[error("missing {0}: set it on the request or configure a client default")]
    MissingIdentifier(Identifier),

    /// HTTP 400 with a decoded body.
    #[error("Bad request: {}", sanitize_error_message(&.0.message))]
    BadRequest(ApiErrorBody),

    /// HTTP 401 with a decoded body.
    #[error("Unauthorized: {}", sanitize_error_message(&.0.message))]
    Unauthorized(ApiErrorBody),

    /// HTTP 403 with a decoded body.
    #[error("Forbidden: {}", sanitize_error_message(&.0.message))]
    Forbidden(ApiErrorBody),

    /// HTTP 404 with a decoded body.
    #[error("Not found: {}", sanitize_error_message(&.0.message))]
    NotFound(ApiErrorBody),

    /// HTTP 409 with a decoded body.
    #[error("Conflict: {}", sanitize_error_message(&.0.message))]
    Conflict(ApiErrorBody),

    /// HTTP 422 with a decoded body.
    #[error("Unprocessable entity: {}", sanitize_error_message(&.0.message))]
    Unprocessable(ApiErrorBody),

    /// Any other status an endpoint documents (for example 5xx), with a decoded body.
    #[error("API error {status}: {}", sanitize_error_message(&.body.message))]
    Service { status: u16, body: ApiErrorBody },

    /// Status code the endpoint does not document. The raw body is kept verbatim.
    #[error("API error {status}: {}", sanitize_error_message(.body))]
    Api { status: u16, body: String },

    /// A documented status code whose body did not match the documented shape.
    #[error("failed to decode {status} error body: {message}")]
    ErrorBodyDecode {
        status: u16,
        body: String,
        message: String,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    ResponseDecode(String),

    /// The per-call deadline elapsed while waiting for the response.
    #[error("Request timeout")]
    Timeout,

    /// The per-call deadline had already passed, so nothing was sent.
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization error for a request body.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ErrorKind {
    /// HTTP status of the failed response, if this kind carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ErrorKind::BadRequest(b)
            | ErrorKind::Unauthorized(b)
            | ErrorKind::Forbidden(b)
            | ErrorKind::NotFound(b)
            | ErrorKind::Conflict(b)
            | ErrorKind::Unprocessable(b) => Some(b.status),
            ErrorKind::Service { status, .. }
            | ErrorKind::Api { status, .. }
            | ErrorKind::ErrorBodyDecode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured body of a documented API error.
    pub fn api_body(&self) -> Option<&ApiErrorBody> {
        match self {
            ErrorKind::BadRequest(b)
            | ErrorKind::Unauthorized(b)
            | ErrorKind::Forbidden(b)
            | ErrorKind::NotFound(b)
            | ErrorKind::Conflict(b)
            | ErrorKind::Unprocessable(b)
            | ErrorKind::Service { body: b, .. } => Some(b),
            _ => None,
        }
    }

    /// Returns true if this error kind is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::Timeout | ErrorKind::Connection(_) => true,
            ErrorKind::Service { status, .. } | ErrorKind::Api { status, .. } => {
                is_retryable_status(*status)
            }
            _ => false,
        }
    }
}

/// Check if an HTTP status code is typically retryable.
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Per-endpoint table of documented error status codes.
///
/// A documented status decodes its body into [`ApiErrorBody`]; anything else
/// becomes [`ErrorKind::Api`] with the raw text preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorMap {
    documented: &'static [u16],
}

impl ErrorMap {
    /// Create a map documenting the given status codes.
    pub const fn new(documented: &'static [u16]) -> Self {
        Self { documented }
    }

    /// Codes nearly every endpoint documents.
    pub const STANDARD: ErrorMap = ErrorMap::new(&[400, 401, 404]);

    /// Standard codes plus 403 for control-plane endpoints.
    pub const CONTROL_PLANE: ErrorMap = ErrorMap::new(&[400, 401, 403, 404]);

    /// Write endpoints that can also conflict or reject the payload.
    pub const WRITE: ErrorMap = ErrorMap::new(&[400, 401, 403, 404, 409, 422]);

    /// No documented codes: every failure keeps its raw body.
    pub const NONE: ErrorMap = ErrorMap::new(&[]);

    /// The documented status codes.
    pub fn documented(&self) -> &'static [u16] {
        self.documented
    }

    /// Returns true if the endpoint documents a body shape for `status`.
    pub fn documents(&self, status: u16) -> bool {
        self.documented.contains(&status)
    }

    /// Turn a non-2xx response into an error.
    pub fn map(&self, status: u16, body: &[u8]) -> Error {
        let text = String::from_utf8_lossy(body).into_owned();

        if !self.documents(status) {
            return Error::new(ErrorKind::Api { status, body: text });
        }

        match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(mut decoded) => {
                decoded.status = status;
                let kind = match status {
                    400 => ErrorKind::BadRequest(decoded),
                    401 => ErrorKind::Unauthorized(decoded),
                    403 => ErrorKind::Forbidden(decoded),
                    404 => ErrorKind::NotFound(decoded),
                    409 => ErrorKind::Conflict(decoded),
                    422 => ErrorKind::Unprocessable(decoded),
                    _ => ErrorKind::Service {
                        status,
                        body: decoded,
                    },
                };
                Error::new(kind)
            }
            Err(err) => Error::with_source(
                ErrorKind::ErrorBodyDecode {
                    status,
                    body: text,
                    message: err.to_string(),
                },
                err,
            ),
        }
    }
}

impl Default for ErrorMap {
    fn default() -> Self {
        ErrorMap::STANDARD
    }
}

static API_KEY_PATTERN: LazyLock<regex_lite::Regex> =
    LazyLock::new(|| regex_lite::Regex::new(r"xau_[A-Za-z0-9]{8,}").expect("valid regex"));

static BEARER_PATTERN: LazyLock<regex_lite::Regex> =
    LazyLock::new(|| regex_lite::Regex::new(r"(?i)bearer\s+[A-Za-z0-9_\-.]+").expect("valid regex"));

/// Sanitize an error message before it is rendered.
///
/// Redacts API keys and bearer tokens and truncates long messages. Raw bodies
/// stored on the error are left untouched.
pub(crate) fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = API_KEY_PATTERN
        .replace_all(message, "[REDACTED_KEY]")
        .to_string();
    sanitized = BEARER_PATTERN
        .replace_all(&sanitized, "Bearer [REDACTED]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
