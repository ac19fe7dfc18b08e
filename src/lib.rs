//! # Image Generation Job Client
//!
//! Rate-limited, timeout-bounded, cancellable client for remote image
//! generation APIs.
//!
//! ## Features
//!
//! - Kie.ai submit/poll job protocol with a bounded poll loop
//! - Google Gemini single-call image generation with local persistence
//! - Sliding-window rate limiter shared by every call of a client
//! - Per-call deadline composed with caller cancellation
//! - Classified errors with remediation hints
//! - Secure credential handling with `SecretString`
//! - Injectable transport, auth and clock for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_genjob::{ImageRequest, KieClient, KieConfig};
//! use secrecy::SecretString;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = KieConfig::builder()
//!         .api_key(SecretString::new("your-api-key".into()))
//!         .build()?;
//!     let client = KieClient::new(config)?;
//!
//!     let cancel = CancellationToken::new();
//!     let result = client
//!         .generate_image(&ImageRequest::new("a red cube"), None, Some(&cancel))
//!         .await?;
//!     println!("{:?}", result.urls());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `client` - Provider clients and builders
//! - `config` - Configuration types and builders
//! - `auth` - API key attachment
//! - `transport` - HTTP transport layer
//! - `error` - Error taxonomy and status classification
//! - `resilience` - Clock, rate limiter and deadline gate
//! - `polling` - Poll loop state machine
//! - `extract` - Result decoding and image storage
//! - `services` - Tasks, credits, images and model catalog
//! - `types` - Wire and domain types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod observability;
pub mod polling;
pub mod resilience;
pub mod services;
pub mod transport;
pub mod types;

// Development/testing module - always available for integration tests
pub mod mocks;

pub use auth::{ApiKeyAuthManager, AuthManager, AuthMethod};
pub use client::{GeminiImageClient, GeminiImageClientBuilder, KieClient, KieClientBuilder};
pub use config::{GeminiImageConfig, GeminiImageConfigBuilder, KieConfig, KieConfigBuilder};
pub use error::{
    ApiError, CancelPoint, ClassifiedError, ConfigurationError, ErrorClassifier, ErrorKind,
    GenJobError, GenJobResult, NetworkError, ResponseError, StorageError, TimeoutError,
};
pub use extract::ImageStore;
pub use polling::{JobStatusSource, PollConfig, PollLoop, PollProgress, ProgressObserver};
pub use resilience::{CallGuard, Clock, RateLimiter, RateLimiterConfig, SystemClock, TimeoutGate};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::{
    AspectRatio, GenerationResult, ImageModel, ImageRequest, JobState, ModelInfo, ModelKind, Quality,
    Resolution, ResultPayload, TaskRecord, DEFAULT_MAX_INLINE_BYTES,
};
