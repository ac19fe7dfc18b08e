//! Tasks service implementation.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::TasksService;
use crate::error::{ApiError, GenJobResult, ResponseError};
use crate::polling::JobStatusSource;
use crate::services::ServiceContext;
use crate::transport::endpoints;
use crate::types::{CreateTaskRequest, RecordEnvelope, TaskEnvelope, TaskRecord};

const REJECTED_HINT: &str = "Check your request parameters";
const SUCCESS_CODE: i64 = 200;

/// Implementation of the TasksService.
#[derive(Debug, Clone)]
pub struct TasksServiceImpl {
    context: ServiceContext,
}

impl TasksServiceImpl {
    pub(crate) fn new(context: ServiceContext) -> Self {
        Self { context }
    }

    fn rejected(&self, code: i64, message: String) -> ApiError {
        ApiError::Rejected {
            provider: self.context.classifier().provider(),
            code,
            message,
            hint: REJECTED_HINT,
        }
    }
}

#[async_trait]
impl TasksService for TasksServiceImpl {
    async fn create_task(
        &self,
        request: &CreateTaskRequest,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<String> {
        let body = serde_json::to_value(request)?;
        let envelope: TaskEnvelope = self
            .context
            .post(endpoints::KIE_CREATE_TASK, &body, cancel)
            .await?;

        if envelope.code != SUCCESS_CODE {
            return Err(self.rejected(envelope.code, envelope.msg).into());
        }

        let created = envelope.data.ok_or_else(|| ResponseError::DeserializationError {
            message: "createTask response is missing data.taskId".to_string(),
        })?;

        tracing::debug!(task_id = %created.task_id, model = %request.model, "Task created");
        Ok(created.task_id)
    }

    async fn get_task(&self, task_id: &str, cancel: Option<&CancellationToken>) -> GenJobResult<TaskRecord> {
        let envelope: RecordEnvelope = self
            .context
            .get(&endpoints::record_info(task_id), cancel)
            .await?;

        if envelope.code != SUCCESS_CODE {
            return Err(self.rejected(envelope.code, envelope.msg).into());
        }

        envelope.data.ok_or_else(|| {
            ResponseError::DeserializationError {
                message: format!("recordInfo response for task {task_id} is missing data"),
            }
            .into()
        })
    }
}

#[async_trait]
impl JobStatusSource for TasksServiceImpl {
    async fn fetch_status(
        &self,
        task_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<TaskRecord> {
        self.get_task(task_id, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorClassifier, ErrorKind, GenJobError};
    use crate::mocks::{MockAuthManager, MockHttpTransport};
    use crate::resilience::{CallGuard, RateLimiter, RateLimiterConfig, KIE_DEADLINE};
    use crate::transport::HttpMethod;
    use crate::types::JobState;
    use std::sync::Arc;

    fn service(transport: &MockHttpTransport) -> TasksServiceImpl {
        let limiter = Arc::new(RateLimiter::new(RateLimiterConfig::unlimited()));
        TasksServiceImpl::new(ServiceContext::new(
            url::Url::parse("https://api.kie.ai").unwrap(),
            Arc::new(transport.clone()),
            Arc::new(MockAuthManager::new("kie-key")),
            CallGuard::new(limiter, KIE_DEADLINE),
            ErrorClassifier::KIE,
        ))
    }

    fn request() -> CreateTaskRequest {
        CreateTaskRequest {
            model: "z-image".to_string(),
            input: serde_json::json!({"prompt": "a red cube"}),
        }
    }

    #[tokio::test]
    async fn test_create_task_posts_body_with_bearer() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(200, r#"{"code":200,"msg":"success","data":{"taskId":"job-1"}}"#);

        let task_id = service(&transport).create_task(&request(), None).await.unwrap();

        assert_eq!(task_id, "job-1");
        transport.verify_request(0, HttpMethod::Post, "https://api.kie.ai/api/v1/jobs/createTask");
        transport.verify_header(0, "Authorization", "Bearer kie-key");
        let sent = transport.last_request().unwrap();
        let body: serde_json::Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"model": "z-image", "input": {"prompt": "a red cube"}}));
    }

    #[tokio::test]
    async fn test_create_task_envelope_rejection_is_api_kind() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(200, r#"{"code":422,"msg":"model not supported","data":null}"#);

        let error = service(&transport).create_task(&request(), None).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Api);
        assert_eq!(error.to_string(), "Kie API: model not supported (code 422)");
        assert_eq!(error.hint(), "Check your request parameters");
    }

    #[tokio::test]
    async fn test_create_task_missing_task_id() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(200, r#"{"code":200,"msg":"success"}"#);

        let error = service(&transport).create_task(&request(), None).await.unwrap_err();

        assert!(matches!(
            error,
            GenJobError::Response(ResponseError::DeserializationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_task_reads_record() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(
            200,
            r#"{"code":200,"msg":"ok","data":{"taskId":"job-1","state":"generating","resultJson":"","failMsg":""}}"#,
        );

        let record = service(&transport).get_task("job-1", None).await.unwrap();

        assert_eq!(record.state, JobState::Generating);
        transport.verify_request(0, HttpMethod::Get, "/api/v1/jobs/recordInfo?taskId=job-1");
    }

    #[tokio::test]
    async fn test_get_task_http_error_is_classified() {
        let transport = MockHttpTransport::new();
        transport.enqueue_json_response(401, r#"{"msg":"unauthorized"}"#);

        let error = service(&transport).get_task("job-1", None).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Http);
        assert!(error.hint().contains("KIE_API_KEY"));
    }
}
