//! Kie.ai job client.

use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::auth::{ApiKeyAuthManager, AuthManager};
use crate::config::KieConfig;
use crate::error::{truncate_chars, ErrorClassifier, GenJobResult};
use crate::observability::{Logger, StructuredLogger};
use crate::polling::{PollLoop, PollProgress, ProgressObserver};
use crate::resilience::{CallGuard, Clock, RateLimiter, SystemClock};
use crate::services::{
    list_models, CreditsService, CreditsServiceImpl, ServiceContext, TasksService, TasksServiceImpl,
};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{CreateTaskRequest, GenerationResult, ImageRequest, ModelInfo, ModelKind};

/// Prompt characters included in log lines.
const PROMPT_LOG_CHARS: usize = 80;

/// Client for the Kie.ai job API.
///
/// ```no_run
/// use integrations_genjob::{ImageModel, ImageRequest, KieClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = KieClient::from_env()?;
/// let request = ImageRequest::new("a red cube").model(ImageModel::ZImage);
/// let result = client.generate_image(&request, None, None).await?;
/// println!("{:?}", result.urls());
/// # Ok(())
/// # }
/// ```
pub struct KieClient {
    config: KieConfig,
    limiter: Arc<RateLimiter>,
    tasks: TasksServiceImpl,
    credits: CreditsServiceImpl,
    poll: PollLoop,
    logger: Arc<dyn Logger>,
}

impl KieClient {
    /// Creates a new client builder.
    pub fn builder() -> KieClientBuilder {
        KieClientBuilder::new()
    }

    /// Creates a client from environment variables.
    pub fn from_env() -> GenJobResult<Self> {
        Self::new(KieConfig::from_env()?)
    }

    /// Creates a client from a configuration object.
    pub fn new(config: KieConfig) -> GenJobResult<Self> {
        KieClientBuilder::from_config(config).build()
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &KieConfig {
        &self.config
    }

    /// Limiter shared by every call of this client.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Access the tasks service.
    pub fn tasks(&self) -> &dyn TasksService {
        &self.tasks
    }

    /// Access the credits service.
    pub fn credits(&self) -> &dyn CreditsService {
        &self.credits
    }

    /// Submits a job and returns its id.
    pub async fn create_task(
        &self,
        request: &CreateTaskRequest,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<String> {
        self.tasks.create_task(request, cancel).await
    }

    /// Polls a submitted job until it finishes.
    pub async fn poll_result(
        &self,
        task_id: &str,
        observer: Option<&dyn ProgressObserver>,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<GenerationResult> {
        let logger = &self.logger;
        let forward = |progress: &PollProgress| {
            logger.debug(
                "Poll",
                json!({
                    "task_id": task_id,
                    "attempt": progress.attempt,
                    "total": progress.total,
                    "state": progress.state.as_str(),
                }),
            );
            if let Some(observer) = observer {
                observer.on_progress(progress);
            }
        };

        self.poll.run(&self.tasks, task_id, Some(&forward), cancel).await
    }

    /// Submits an image job and waits for its URLs.
    pub async fn generate_image(
        &self,
        request: &ImageRequest,
        observer: Option<&dyn ProgressObserver>,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<GenerationResult> {
        self.logger.info(
            "Creating task",
            json!({
                "model": request.model.id(),
                "prompt": format!("{}...", truncate_chars(&request.prompt, PROMPT_LOG_CHARS)),
            }),
        );

        let task_id = self.create_task(&request.to_task_request(), cancel).await?;
        self.logger.info("Task created", json!({ "task_id": task_id }));

        match self.poll_result(&task_id, observer, cancel).await {
            Ok(result) => {
                self.logger.info(
                    "Generation complete",
                    json!({ "task_id": task_id, "images": result.urls().len() }),
                );
                Ok(result)
            }
            Err(error) => {
                self.logger.warn(
                    "Generation did not complete",
                    json!({ "task_id": task_id, "error": error.to_string(), "kind": format!("{:?}", error.kind()) }),
                );
                Err(error)
            }
        }
    }

    /// Returns the remaining credit balance.
    pub async fn check_credits(&self, cancel: Option<&CancellationToken>) -> GenJobResult<f64> {
        self.credits.check_credits(cancel).await
    }

    /// Lists the model catalog.
    pub fn list_models(&self, kind: Option<ModelKind>) -> Vec<ModelInfo> {
        list_models(kind)
    }
}

impl std::fmt::Debug for KieClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KieClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("limiter", &self.limiter)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

/// Builder for creating a [`KieClient`].
#[derive(Default)]
pub struct KieClientBuilder {
    config: Option<KieConfig>,

    // Injectable dependencies for testing
    transport: Option<Arc<dyn HttpTransport>>,
    auth_manager: Option<Arc<dyn AuthManager>>,
    clock: Option<Arc<dyn Clock>>,
    limiter: Option<Arc<RateLimiter>>,
    logger: Option<Arc<dyn Logger>>,
}

impl KieClientBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: KieConfig) -> Self {
        Self::new().config(config)
    }

    /// Sets the configuration. Without one, `build` reads the environment.
    pub fn config(mut self, config: KieConfig) -> Self {
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

    /// Sets the clock used by the limiter and the poll loop.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Shares an existing limiter instead of creating one from the configuration.
    pub fn limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Sets a custom logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Configuration errors (including a missing API key) and failure to
    /// create the HTTP transport. No network call is made.
    pub fn build(self) -> GenJobResult<KieClient> {
        let config = match self.config {
            Some(config) => config,
            None => KieConfig::from_env()?,
        };

        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let limiter = self
            .limiter
            .unwrap_or_else(|| Arc::new(RateLimiter::with_clock(config.rate_limit.clone(), Arc::clone(&clock))));

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.connect_timeout)?),
        };

        let auth_manager: Arc<dyn AuthManager> = self
            .auth_manager
            .unwrap_or_else(|| Arc::new(ApiKeyAuthManager::bearer(config.api_key.clone())));

        let logger: Arc<dyn Logger> = self
            .logger
            .unwrap_or_else(|| Arc::new(StructuredLogger::new("genjob.kie")));

        let context = ServiceContext::new(
            config.base_url.clone(),
            transport,
            auth_manager,
            CallGuard::new(Arc::clone(&limiter), config.timeout),
            ErrorClassifier::KIE,
        );

        logger.info(
            "Kie client initialized",
            json!({
                "base_url": config.base_url.as_str(),
                "timeout_ms": config.timeout.as_millis() as u64,
                "poll_interval_ms": config.poll.interval.as_millis() as u64,
                "poll_max_attempts": config.poll.max_attempts,
                "rate_limit_max": limiter.config().max_requests,
                "rate_limit_window_ms": limiter.config().window.as_millis() as u64,
            }),
        );

        Ok(KieClient {
            tasks: TasksServiceImpl::new(context.clone()),
            credits: CreditsServiceImpl::new(context),
            poll: PollLoop::with_clock(config.poll, clock),
            limiter,
            logger,
            config,
        })
    }
}
