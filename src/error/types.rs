//! Main error type for the generation job client.

use thiserror::Error;
use super::categories::*;

/// Result type alias for generation job operations.
pub type GenJobResult<T> = Result<T, GenJobError>;

/// An error enriched with a remediation hint intended for direct user display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ClassifiedError {
    /// Human-readable message.
    pub message: String,
    /// HTTP status (or equivalent) code.
    pub status_code: u16,
    /// Remediation hint.
    pub hint: String,
}

impl ClassifiedError {
    /// Creates a classified error.
    pub fn new(message: impl Into<String>, status_code: u16, hint: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
            hint: hint.into(),
        }
    }

    /// Formats the message followed by the hint, the way callers are expected to surface it.
    pub fn with_suggestion(&self) -> String {
        format!("{}\n\nSuggestion: {}", self.message, self.hint)
    }
}

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing credential or invalid setting.
    Configuration,
    /// Non-2xx HTTP response.
    Http,
    /// 2xx response carrying an embedded failure.
    Api,
    /// Response did not match the expected shape.
    Response,
    /// Poll budget or per-call deadline exhausted.
    Timeout,
    /// Transport-level failure.
    Network,
    /// Persisting a result failed.
    Storage,
    /// Caller-requested cancellation.
    Cancelled,
}

/// Top-level error type for the generation job client.
#[derive(Error, Debug, Clone)]
pub enum GenJobError {
    /// Missing credential or invalid setting.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Non-2xx response, classified with a hint.
    #[error("{0}")]
    Http(ClassifiedError),

    /// 2xx response carrying a failure.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Response did not match the expected shape.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// Poll budget or per-call deadline exhausted.
    #[error("{0}")]
    Timeout(#[from] TimeoutError),

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Persisting a result failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The caller's token fired.
    #[error("Operation cancelled while {point}")]
    Cancelled {
        /// Where the cancellation was observed.
        point: CancelPoint,
    },
}

impl GenJobError {
    /// Creates a cancellation outcome observed at `point`.
    pub fn cancelled(point: CancelPoint) -> Self {
        GenJobError::Cancelled { point }
    }

    /// Returns the machine-readable category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenJobError::Configuration(_) => ErrorKind::Configuration,
            GenJobError::Http(_) => ErrorKind::Http,
            GenJobError::Api(_) => ErrorKind::Api,
            GenJobError::Response(_) => ErrorKind::Response,
            GenJobError::Timeout(_) => ErrorKind::Timeout,
            GenJobError::Network(_) => ErrorKind::Network,
            GenJobError::Storage(_) => ErrorKind::Storage,
            GenJobError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Returns true if this is the cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenJobError::Cancelled { .. })
    }

    /// Returns the status code associated with this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GenJobError::Configuration(e) => e.status_code(),
            GenJobError::Http(e) => e.status_code,
            GenJobError::Api(e) => e.status_code(),
            GenJobError::Response(e) => e.status_code(),
            GenJobError::Timeout(_) => 408,
            GenJobError::Network(_) => 503,
            GenJobError::Storage(_) => 500,
            GenJobError::Cancelled { .. } => 499,
        }
    }

    /// Returns the remediation hint for this error.
    pub fn hint(&self) -> &str {
        match self {
            GenJobError::Configuration(e) => e.hint(),
            GenJobError::Http(e) => &e.hint,
            GenJobError::Api(e) => e.hint(),
            GenJobError::Response(e) => e.hint(),
            GenJobError::Timeout(e) => e.hint(),
            GenJobError::Network(_) => "Check your network connection and try again",
            GenJobError::Storage(_) => "Check that the image directory exists and is writable",
            GenJobError::Cancelled { .. } => "The operation was cancelled by the caller",
        }
    }

    /// Flattens this error into a message/code/hint triple.
    pub fn classified(&self) -> ClassifiedError {
        match self {
            GenJobError::Http(e) => e.clone(),
            other => ClassifiedError::new(other.to_string(), other.status_code(), other.hint()),
        }
    }
}

impl From<ClassifiedError> for GenJobError {
    fn from(err: ClassifiedError) -> Self {
        GenJobError::Http(err)
    }
}

impl From<serde_json::Error> for GenJobError {
    fn from(err: serde_json::Error) -> Self {
        GenJobError::Response(ResponseError::DeserializationError {
            message: err.to_string(),
        })
    }
}

impl From<url::ParseError> for GenJobError {
    fn from(err: url::ParseError) -> Self {
        GenJobError::Configuration(ConfigurationError::InvalidBaseUrl {
            url: err.to_string(),
        })
    }
}
