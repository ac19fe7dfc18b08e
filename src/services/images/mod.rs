//! Gemini single-call image generation service.

mod service;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::GenJobResult;
use crate::types::GenerationResult;

pub use service::ImagesServiceImpl;

/// Service for synchronous image generation.
#[async_trait]
pub trait ImagesService: Send + Sync {
    /// Generates one image from `prompt` and persists it.
    async fn generate_image(
        &self,
        prompt: &str,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<GenerationResult>;
}
