//! Gemini image generation configuration.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use super::{
    parse_base_url, parse_var, process_env, require_nonzero, require_positive,
    DEFAULT_CONNECT_TIMEOUT_SECS,
};
use crate::auth::AuthMethod;
use crate::error::{ConfigurationError, GenJobResult};
use crate::resilience::{RateLimiterConfig, GEMINI_DEADLINE};

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default API version.
pub const DEFAULT_GEMINI_API_VERSION: &str = "v1beta";

/// Default image generation model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

/// Default directory for generated images.
pub const DEFAULT_IMAGE_DIR: &str = "/tmp/claude-images";

const API_KEY_VAR: &str = "GOOGLE_API_KEY";
const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";
const API_KEY_HINT: &str = "Set GOOGLE_API_KEY env variable with your Google AI Studio key";

/// Configuration for the Gemini image client.
#[derive(Clone, Debug)]
pub struct GeminiImageConfig {
    /// API key (required).
    pub api_key: SecretString,
    /// Base URL for the API.
    pub base_url: Url,
    /// API version path segment.
    pub api_version: String,
    /// Image generation model.
    pub model: String,
    /// Per-call deadline.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Request budget.
    pub rate_limit: RateLimiterConfig,
    /// Where decoded images are written.
    pub image_dir: PathBuf,
    /// How the key is attached.
    pub auth_method: AuthMethod,
}

impl GeminiImageConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GeminiImageConfigBuilder {
        GeminiImageConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> GenJobResult<Self> {
        Self::from_lookup(process_env)
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<L>(lookup: L) -> GenJobResult<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(key) = lookup(API_KEY_VAR).or_else(|| lookup(FALLBACK_API_KEY_VAR)) {
            builder = builder.api_key(SecretString::new(key));
        }
        if let Some(url) = lookup("GEMINI_BASE_URL") {
            builder = builder.base_url(&url)?;
        }
        if let Some(model) = lookup("GEMINI_IMAGE_MODEL") {
            builder = builder.model(&model);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "GEMINI_TIMEOUT_SECS")? {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(dir) = lookup("GEMINI_IMAGE_DIR") {
            builder = builder.image_dir(dir);
        }

        let max = parse_var::<u32, _>(&lookup, "GEMINI_RATE_LIMIT_MAX")?;
        let window = parse_var::<u64, _>(&lookup, "GEMINI_RATE_LIMIT_WINDOW_MS")?;
        if max.is_some() || window.is_some() {
            let defaults = RateLimiterConfig::gemini();
            let max = match max {
                Some(max) => require_nonzero("GEMINI_RATE_LIMIT_MAX", max)?,
                None => defaults.max_requests,
            };
            let window = match window {
                Some(ms) => require_positive("GEMINI_RATE_LIMIT_WINDOW_MS", Duration::from_millis(ms))?,
                None => defaults.window,
            };
            builder = builder.rate_limit(RateLimiterConfig::new(max, window));
        }

        builder.build()
    }
}

/// Builder for GeminiImageConfig.
#[derive(Default)]
pub struct GeminiImageConfigBuilder {
    api_key: Option<SecretString>,
    base_url: Option<Url>,
    api_version: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    rate_limit: Option<RateLimiterConfig>,
    image_dir: Option<PathBuf>,
    auth_method: Option<AuthMethod>,
}

impl GeminiImageConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: &str) -> GenJobResult<Self> {
        self.base_url = Some(parse_base_url(base_url)?);
        Ok(self)
    }

    /// Set the API version.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Set the model.
    pub fn model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    /// Set the per-call deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the request budget.
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Set the image output directory.
    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Set the authentication method.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GenJobResult<GeminiImageConfig> {
        let api_key = self.api_key.ok_or_else(|| ConfigurationError::MissingApiKey {
            env_var: API_KEY_VAR.to_string(),
            hint: API_KEY_HINT.to_string(),
        })?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => parse_base_url(DEFAULT_GEMINI_BASE_URL)?,
        };

        let auth_method = match self.auth_method {
            None | Some(AuthMethod::Bearer) => AuthMethod::GoogleHeader,
            Some(method) => method,
        };

        Ok(GeminiImageConfig {
            api_key,
            base_url,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_GEMINI_API_VERSION.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            timeout: require_positive("GEMINI_TIMEOUT_SECS", self.timeout.unwrap_or(GEMINI_DEADLINE))?,
            connect_timeout: self
                .connect_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            rate_limit: self.rate_limit.unwrap_or_else(RateLimiterConfig::gemini),
            image_dir: self.image_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR)),
            auth_method,
        })
    }
}
