//! Gemini image generation client.

use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::auth::{ApiKeyAuthManager, AuthManager};
use crate::config::GeminiImageConfig;
use crate::error::{truncate_chars, ErrorClassifier, GenJobResult};
use crate::extract::ImageStore;
use crate::observability::{Logger, StructuredLogger};
use crate::resilience::{CallGuard, Clock, RateLimiter, SystemClock};
use crate::services::{ImagesService, ImagesServiceImpl, ServiceContext};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::GenerationResult;

/// Client for Gemini single-call image generation.
pub struct GeminiImageClient {
    config: GeminiImageConfig,
    limiter: Arc<RateLimiter>,
    images: ImagesServiceImpl,
    logger: Arc<dyn Logger>,
}

impl GeminiImageClient {
    /// Creates a new client builder.
    pub fn builder() -> GeminiImageClientBuilder {
        GeminiImageClientBuilder::new()
    }

    /// Creates a client from environment variables.
    pub fn from_env() -> GenJobResult<Self> {
        Self::new(GeminiImageConfig::from_env()?)
    }

    /// Creates a client from a configuration object.
    pub fn new(config: GeminiImageConfig) -> GenJobResult<Self> {
        GeminiImageClientBuilder::from_config(config).build()
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &GeminiImageConfig {
        &self.config
    }

    /// Limiter shared by every call of this client.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Access the images service.
    pub fn images(&self) -> &dyn ImagesService {
        &self.images
    }

    /// Generates one image and writes it to the configured directory.
    pub async fn generate_image(
        &self,
        prompt: &str,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<GenerationResult> {
        self.logger.info(
            "Generating image",
            json!({ "model": self.config.model, "prompt": truncate_chars(prompt, 80) }),
        );

        let result = self.images.generate_image(prompt, cancel).await;
        match &result {
            Ok(generated) => self.logger.info(
                "Image saved",
                json!({
                    "path": generated.stored_at().map(|p| p.display().to_string()),
                    "size_kb": generated.size_bytes / 1024,
                }),
            ),
            Err(error) => self.logger.warn(
                "Image generation failed",
                json!({ "error": error.to_string(), "hint": error.hint() }),
            ),
        }
        result
    }
}

impl std::fmt::Debug for GeminiImageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiImageClient")
            .field("model", &self.config.model)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

/// Builder for creating a [`GeminiImageClient`].
#[derive(Default)]
pub struct GeminiImageClientBuilder {
    config: Option<GeminiImageConfig>,

    // Injectable dependencies for testing
    transport: Option<Arc<dyn HttpTransport>>,
    auth_manager: Option<Arc<dyn AuthManager>>,
    clock: Option<Arc<dyn Clock>>,
    limiter: Option<Arc<RateLimiter>>,
    logger: Option<Arc<dyn Logger>>,
}

impl GeminiImageClientBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: GeminiImageConfig) -> Self {
        Self::new().config(config)
    }

    /// Sets the configuration. Without one, `build` reads the environment.
    pub fn config(mut self, config: GeminiImageConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a custom HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth manager.
    pub fn auth_manager(mut self, auth_manager: Arc<dyn AuthManager>) -> Self {
        self.auth_manager = Some(auth_manager);
        self
    }

    /// Sets the clock used by the limiter.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Shares an existing limiter.
    pub fn limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Sets a custom logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the client. No network call is made.
    pub fn build(self) -> GenJobResult<GeminiImageClient> {
        let config = match self.config {
            Some(config) => config,
            None => GeminiImageConfig::from_env()?,
        };

        let limiter = self.limiter.unwrap_or_else(|| {
            let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
            Arc::new(RateLimiter::with_clock(config.rate_limit.clone(), clock))
        });

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.connect_timeout)?),
        };

        let auth_manager: Arc<dyn AuthManager> = self.auth_manager.unwrap_or_else(|| {
            Arc::new(ApiKeyAuthManager::new(config.api_key.clone(), config.auth_method))
        });

        let logger: Arc<dyn Logger> = self
            .logger
            .unwrap_or_else(|| Arc::new(StructuredLogger::new("genjob.gemini")));

        let context = ServiceContext::new(
            config.base_url.clone(),
            transport,
            auth_manager,
            CallGuard::new(Arc::clone(&limiter), config.timeout),
            ErrorClassifier::GEMINI,
        );

        logger.info(
            "Gemini image client initialized",
            json!({
                "base_url": config.base_url.as_str(),
                "api_version": config.api_version,
                "model": config.model,
                "auth_method": format!("{:?}", config.auth_method),
                "image_dir": config.image_dir.display().to_string(),
            }),
        );

        Ok(GeminiImageClient {
            images: ImagesServiceImpl::new(
                context,
                config.api_version.clone(),
                config.model.clone(),
                ImageStore::new(config.image_dir.clone()),
            ),
            limiter,
            logger,
            config,
        })
    }
}
