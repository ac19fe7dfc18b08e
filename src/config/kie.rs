//! Kie.ai job API configuration.

use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use super::{
    parse_base_url, parse_var, process_env, require_nonzero, require_positive,
    DEFAULT_CONNECT_TIMEOUT_SECS,
};
use crate::error::{ConfigurationError, GenJobResult};
use crate::polling::PollConfig;
use crate::resilience::{RateLimiterConfig, KIE_DEADLINE};

/// Default Kie.ai base URL.
pub const DEFAULT_KIE_BASE_URL: &str = "https://api.kie.ai";

const API_KEY_VAR: &str = "KIE_API_KEY";
const API_KEY_HINT: &str = "Get your key at https://kie.ai/api-key and set KIE_API_KEY env variable";

/// Configuration for the Kie.ai client.
#[derive(Clone, Debug)]
pub struct KieConfig {
    /// API key (required).
    pub api_key: SecretString,
    /// Base URL for the API.
    pub base_url: Url,
    /// Per-call deadline.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Poll cadence and attempt ceiling.
    pub poll: PollConfig,
    /// Request budget.
    pub rate_limit: RateLimiterConfig,
}

impl KieConfig {
    /// Create a new configuration builder.
    pub fn builder() -> KieConfigBuilder {
        KieConfigBuilder::default()
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

        if let Some(key) = lookup(API_KEY_VAR) {
            builder = builder.api_key(SecretString::new(key));
        }
        if let Some(url) = lookup("KIE_BASE_URL") {
            builder = builder.base_url(&url)?;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "KIE_TIMEOUT_SECS")? {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "KIE_POLL_INTERVAL_MS")? {
            builder = builder.poll_interval(Duration::from_millis(ms));
        }
        if let Some(attempts) = parse_var::<u32, _>(&lookup, "KIE_POLL_MAX_ATTEMPTS")? {
            builder = builder.poll_max_attempts(attempts);
        }

        let max = parse_var::<u32, _>(&lookup, "KIE_RATE_LIMIT_MAX")?;
        let window = parse_var::<u64, _>(&lookup, "KIE_RATE_LIMIT_WINDOW_MS")?;
        if max.is_some() || window.is_some() {
            let defaults = RateLimiterConfig::kie();
            let max = match max {
                Some(max) => require_nonzero("KIE_RATE_LIMIT_MAX", max)?,
                None => defaults.max_requests,
            };
            let window = match window {
                Some(ms) => require_positive("KIE_RATE_LIMIT_WINDOW_MS", Duration::from_millis(ms))?,
                None => defaults.window,
            };
            builder = builder.rate_limit(RateLimiterConfig::new(max, window));
        }

        builder.build()
    }
}

/// Builder for KieConfig.
#[derive(Default)]
pub struct KieConfigBuilder {
    api_key: Option<SecretString>,
    base_url: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    poll_max_attempts: Option<u32>,
    rate_limit: Option<RateLimiterConfig>,
}

impl KieConfigBuilder {
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

    /// Set the delay between status polls.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Set the maximum number of status polls.
    pub fn poll_max_attempts(mut self, attempts: u32) -> Self {
        self.poll_max_attempts = Some(attempts);
        self
    }

    /// Set the request budget.
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GenJobResult<KieConfig> {
        let api_key = self.api_key.ok_or_else(|| ConfigurationError::MissingApiKey {
            env_var: API_KEY_VAR.to_string(),
            hint: API_KEY_HINT.to_string(),
        })?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => parse_base_url(DEFAULT_KIE_BASE_URL)?,
        };

        let defaults = PollConfig::default();
        let max_attempts = self.poll_max_attempts.unwrap_or(defaults.max_attempts);
        if max_attempts == 0 {
            return Err(ConfigurationError::InvalidValue {
                name: "KIE_POLL_MAX_ATTEMPTS".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }

        Ok(KieConfig {
            api_key,
            base_url,
            timeout: require_positive("KIE_TIMEOUT_SECS", self.timeout.unwrap_or(KIE_DEADLINE))?,
            connect_timeout: self
                .connect_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            poll: PollConfig::new(self.poll_interval.unwrap_or(defaults.interval), max_attempts),
            rate_limit: self.rate_limit.unwrap_or_else(RateLimiterConfig::kie),
        })
    }
}
