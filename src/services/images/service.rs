//! Images service implementation.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::ImagesService;
use crate::error::{truncate_chars, ApiError, GenJobResult};
use crate::extract::{decode_inline, ImageStore};
use crate::services::ServiceContext;
use crate::transport::endpoints;
use crate::types::{GenerateImageRequest, GenerateImageResponse, GenerationResult, InlineData};

/// Characters of model text kept when no image came back.
const MAX_REFUSAL_CHARS: usize = 200;

/// Implementation of the ImagesService.
#[derive(Debug, Clone)]
pub struct ImagesServiceImpl {
    context: ServiceContext,
    api_version: String,
    model: String,
    store: ImageStore,
}

impl ImagesServiceImpl {
    pub(crate) fn new(context: ServiceContext, api_version: String, model: String, store: ImageStore) -> Self {
        Self {
            context,
            api_version,
            model,
            store,
        }
    }

    /// Model used for generation.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Where images are written.
    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    // Embedded error, then missing candidates, then missing image part.
    fn select_image(&self, response: GenerateImageResponse) -> GenJobResult<InlineData> {
        if let Some(error) = response.error {
            return Err(ApiError::Rejected {
                provider: self.context.classifier().provider(),
                code: error.code,
                message: error.message,
                hint: "Check your request parameters",
            }
            .into());
        }

        let candidate = response
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .ok_or(ApiError::NoCandidates)?;

        let parts = candidate.content.map(|content| content.parts).unwrap_or_default();
        let text = parts
            .iter()
            .find_map(|part| part.text.as_deref().filter(|t| !t.is_empty()))
            .map(|t| truncate_chars(t, MAX_REFUSAL_CHARS).to_string());

        parts
            .into_iter()
            .find_map(|part| part.inline_data)
            .ok_or_else(|| ApiError::NoImage { text }.into())
    }
}

#[async_trait]
impl ImagesService for ImagesServiceImpl {
    async fn generate_image(
        &self,
        prompt: &str,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<GenerationResult> {
        tracing::info!(model = %self.model, "Sending request to Gemini");

        let body = serde_json::to_value(GenerateImageRequest::from_prompt(prompt))?;
        let response: GenerateImageResponse = self
            .context
            .post(&endpoints::generate_content(&self.api_version, &self.model), &body, cancel)
            .await?;

        let inline = self.select_image(response)?;
        decode_inline(inline.data, &inline.mime_type, &self.store).await
    }
}
