//! Configuration types for the provider clients.
//!
//! Each provider has a config struct, a builder with `build()` validation and
//! a `from_env()` constructor. The API key is required; its absence fails
//! before any network activity.

mod gemini;
mod kie;

pub use gemini::{
    GeminiImageConfig, GeminiImageConfigBuilder, DEFAULT_GEMINI_API_VERSION, DEFAULT_GEMINI_BASE_URL,
    DEFAULT_GEMINI_MODEL, DEFAULT_IMAGE_DIR,
};
pub use kie::{KieConfig, KieConfigBuilder, DEFAULT_KIE_BASE_URL};

use std::str::FromStr;
use std::time::Duration;

use crate::error::{ConfigurationError, GenJobError, GenJobResult};

/// Default connect timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Environment lookup used by `from_env`; swapped out in tests.
pub(crate) fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Parses an optional numeric variable, naming it in the error.
pub(crate) fn parse_var<T, L>(lookup: &L, name: &str) -> GenJobResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    L: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            GenJobError::Configuration(ConfigurationError::InvalidValue {
                name: name.to_string(),
                message: format!("'{raw}': {e}"),
            })
        }),
    }
}

/// Rejects zero durations for settings that must be positive.
pub(crate) fn require_positive(name: &str, value: Duration) -> GenJobResult<Duration> {
    if value.is_zero() {
        return Err(ConfigurationError::InvalidValue {
            name: name.to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into());
    }
    Ok(value)
}

/// Rejects a zero count for settings that must be positive.
pub(crate) fn require_nonzero(name: &str, value: u32) -> GenJobResult<u32> {
    if value == 0 {
        return Err(ConfigurationError::InvalidValue {
            name: name.to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into());
    }
    Ok(value)
}

/// Parses a base URL, requiring an http(s) scheme.
pub(crate) fn parse_base_url(raw: &str) -> GenJobResult<url::Url> {
    let url = url::Url::parse(raw).map_err(|_| ConfigurationError::InvalidBaseUrl {
        url: raw.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigurationError::InvalidBaseUrl {
            url: raw.to_string(),
        }
        .into());
    }
    Ok(url)
}
