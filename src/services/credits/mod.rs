//! Kie.ai credit balance service.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, GenJobResult, ResponseError};
use crate::services::ServiceContext;
use crate::transport::endpoints;
use crate::types::CreditEnvelope;

/// Service for reading the account balance.
#[async_trait]
pub trait CreditsService: Send + Sync {
    /// Returns the remaining credits.
    async fn check_credits(&self, cancel: Option<&CancellationToken>) -> GenJobResult<f64>;
}

/// Implementation of the CreditsService.
#[derive(Debug, Clone)]
pub struct CreditsServiceImpl {
    context: ServiceContext,
}

impl CreditsServiceImpl {
    pub(crate) fn new(context: ServiceContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl CreditsService for CreditsServiceImpl {
    async fn check_credits(&self, cancel: Option<&CancellationToken>) -> GenJobResult<f64> {
        let envelope: CreditEnvelope = self.context.get(endpoints::KIE_CREDITS, cancel).await?;

        if envelope.code != 200 {
            return Err(ApiError::Rejected {
                provider: self.context.classifier().provider(),
                code: envelope.code,
                message: envelope.msg,
                hint: "Check your API key",
            }
            .into());
        }

        envelope.data.ok_or_else(|| {
            ResponseError::DeserializationError {
                message: "credit response is missing data".to_string(),
            }
            .into()
        })
    }
}
