//! Error category types for granular error handling.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Error, Debug, Clone)]
pub enum ConfigurationError {
    /// Required credential is absent.
    #[error("{env_var} not set")]
    MissingApiKey {
        /// Variable that should hold the key.
        env_var: String,
        /// Where to obtain a key.
        hint: String,
    },

    /// Base URL is not an absolute http(s) URL.
    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl {
        /// Offending value.
        url: String,
    },

    /// A setting failed validation.
    #[error("Invalid value for {name}: {message}")]
    InvalidValue {
        /// Setting or variable name.
        name: String,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigurationError {
    /// Remediation hint for this error.
    pub fn hint(&self) -> &str {
        match self {
            ConfigurationError::MissingApiKey { hint, .. } => hint,
            ConfigurationError::InvalidBaseUrl { .. } => {
                "Use an absolute http(s) URL such as https://api.kie.ai"
            }
            ConfigurationError::InvalidValue { .. } => {
                "Fix the configuration value and restart the client"
            }
        }
    }

    /// Status code reported alongside the error.
    pub fn status_code(&self) -> u16 {
        match self {
            ConfigurationError::MissingApiKey { .. } => 401,
            _ => 400,
        }
    }
}

/// Application-level failures reported inside a successful HTTP response.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Envelope or embedded error with a non-success code.
    #[error("{provider} API: {message} (code {code})")]
    Rejected {
        /// Provider label.
        provider: &'static str,
        /// Provider code.
        code: i64,
        /// Provider message.
        message: String,
        /// Remediation hint.
        hint: &'static str,
    },

    /// The job reached the `fail` state.
    #[error("Generation failed: {message}")]
    GenerationFailed {
        /// Job id.
        task_id: String,
        /// Provider failure message.
        message: String,
    },

    /// The reply carried no candidates.
    #[error("No candidates in response; image may have been blocked by safety filters")]
    NoCandidates,

    /// The first candidate carried no inline image.
    #[error("No image in response{}", .text.as_deref().map(|t| format!(": {t}")).unwrap_or_default())]
    NoImage {
        /// Text the model returned instead, truncated.
        text: Option<String>,
    },
}

impl ApiError {
    /// Remediation hint for this error.
    pub fn hint(&self) -> &str {
        match self {
            ApiError::Rejected { hint, .. } => hint,
            ApiError::GenerationFailed { .. } => "Try a different prompt or model",
            ApiError::NoCandidates => "Try a different prompt that doesn't violate content policy",
            ApiError::NoImage { .. } => {
                "Model returned text instead of image; try a more specific visual prompt"
            }
        }
    }

    /// Status code reported alongside the error.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Rejected { code, .. } => u16::try_from(*code).unwrap_or(500),
            ApiError::GenerationFailed { .. } => 500,
            ApiError::NoCandidates | ApiError::NoImage { .. } => 400,
        }
    }
}

/// Response bodies that do not match the expected structure.
#[derive(Error, Debug, Clone)]
pub enum ResponseError {
    /// Body did not deserialize into the expected shape.
    #[error("Failed to deserialize response: {message}")]
    DeserializationError {
        /// Decoder message.
        message: String,
    },

    /// Job succeeded without a `resultJson`.
    #[error("API returned success but no resultJson for task {task_id}")]
    MissingResult {
        /// Job id.
        task_id: String,
    },

    /// `resultJson` listed no URLs.
    #[error("Result for task {task_id} contains no URLs")]
    EmptyResult {
        /// Job id.
        task_id: String,
    },

    /// Inline payload was not valid base64.
    #[error("Invalid base64 image payload: {message}")]
    InvalidPayload {
        /// Decoder message.
        message: String,
    },
}

impl ResponseError {
    /// Remediation hint for this error.
    pub fn hint(&self) -> &str {
        match self {
            ResponseError::DeserializationError { .. } => {
                "The provider response did not match the expected format; try again later"
            }
            ResponseError::MissingResult { .. } | ResponseError::EmptyResult { .. } => "Try again",
            ResponseError::InvalidPayload { .. } => {
                "The provider returned a corrupt image payload; try again"
            }
        }
    }

    /// Status code reported alongside the error.
    pub fn status_code(&self) -> u16 {
        match self {
            ResponseError::MissingResult { .. } | ResponseError::EmptyResult { .. } => 500,
            _ => 502,
        }
    }
}

/// Time budget exhaustion.
#[derive(Error, Debug, Clone)]
pub enum TimeoutError {
    /// Poll attempts ran out before a terminal state.
    #[error("Timeout after {}s waiting for task {task_id}", .elapsed.as_secs())]
    PollExhausted {
        /// Job id.
        task_id: String,
        /// Status calls made.
        attempts: u32,
        /// Nominal budget, `attempts × interval`.
        elapsed: Duration,
    },

    /// Per-call deadline elapsed.
    #[error("Request timed out after {duration:?}")]
    Deadline {
        /// Deadline that elapsed.
        duration: Duration,
    },

    /// The HTTP transport timed out on its own.
    #[error("Request timed out in the transport")]
    Transport,
}

impl TimeoutError {
    /// Remediation hint for this error.
    pub fn hint(&self) -> &str {
        match self {
            TimeoutError::PollExhausted { .. } => {
                "Try again; generation may take longer for complex prompts"
            }
            TimeoutError::Deadline { .. } | TimeoutError::Transport => {
                "The provider did not answer in time; try again"
            }
        }
    }
}

/// Network-related errors.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    /// Server unreachable or the exchange broke off.
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Transport message, without the request URL.
        message: String,
    },

    /// Response could not be read.
    #[error("Request failed: {message}")]
    RequestFailed {
        /// Transport message.
        message: String,
    },
}

/// Local persistence errors.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Image directory could not be created.
    #[error("Failed to create directory {path}: {message}")]
    CreateDir {
        /// Directory path.
        path: String,
        /// I/O message.
        message: String,
    },

    /// Image file could not be written.
    #[error("Failed to write {path}: {message}")]
    Write {
        /// File path.
        path: String,
        /// I/O message.
        message: String,
    },
}

/// Suspension point at which a cancellation was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelPoint {
    /// Waiting for rate limiter admission.
    RateLimit,
    /// Awaiting a network response.
    Request,
    /// Before starting a poll attempt.
    BeforePoll,
    /// Sleeping between poll attempts.
    PollSleep,
}

impl fmt::Display for CancelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CancelPoint::RateLimit => "waiting for rate limiter",
            CancelPoint::Request => "awaiting response",
            CancelPoint::BeforePoll => "starting poll attempt",
            CancelPoint::PollSleep => "waiting between polls",
        };
        f.write_str(text)
    }
}
