//! Integration tests for the Kie.ai submit/poll flow.

use integrations_genjob::mocks::{ManualClock, MockHttpTransport};
use integrations_genjob::observability::NoopLogger;
use integrations_genjob::{
    ApiError, CancelPoint, ErrorKind, GenJobError, HttpMethod, ImageModel, ImageRequest, JobState,
    KieClient, KieConfig, PollProgress, ResponseError, SystemClock, TimeoutError,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const SUBMITTED: &str = r#"{"code":200,"msg":"success","data":{"taskId":"job-1"}}"#;
const GENERATING: &str = r#"{"code":200,"msg":"success","data":{"taskId":"job-1","state":"generating"}}"#;
const SUCCEEDED: &str = r#"{"code":200,"msg":"success","data":{"taskId":"job-1","state":"success","resultJson":"{\"resultUrls\":[\"https://cdn.example/job-1.png\"]}"}}"#;

fn test_config(max_attempts: u32) -> KieConfig {
    KieConfig::builder()
        .api_key(SecretString::new("kie-test-key".into()))
        .poll_max_attempts(max_attempts)
        .build()
        .unwrap()
}

fn create_test_client(transport: &MockHttpTransport, max_attempts: u32) -> (KieClient, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let client = KieClient::builder()
        .config(test_config(max_attempts))
        .transport(Arc::new(transport.clone()))
        .clock(clock.clone())
        .logger(Arc::new(NoopLogger))
        .build()
        .unwrap();
    (client, clock)
}

#[tokio::test]
async fn test_z_image_job_polls_until_success() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, SUBMITTED);
    transport.enqueue_json_response(200, GENERATING);
    transport.enqueue_json_response(200, GENERATING);
    transport.enqueue_json_response(200, SUCCEEDED);
    let (client, clock) = create_test_client(&transport, 24);
    let seen = Mutex::new(Vec::new());
    let observer = |progress: &PollProgress| seen.lock().push((progress.attempt, progress.state.clone()));
    let request = ImageRequest::new("a lighthouse at dusk").model(ImageModel::ZImage);

    // Act
    let result = client.generate_image(&request, Some(&observer), None).await.unwrap();

    // Assert
    assert_eq!(result.urls(), ["https://cdn.example/job-1.png".to_string()]);
    transport.verify_request_count(4);
    transport.verify_request(0, HttpMethod::Post, "/api/v1/jobs/createTask");
    for index in 1..4 {
        transport.verify_request(index, HttpMethod::Get, "/api/v1/jobs/recordInfo?taskId=job-1");
    }
    assert_eq!(
        seen.into_inner(),
        vec![(1, JobState::Generating), (2, JobState::Generating)]
    );
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5); 2]);
}

#[tokio::test]
async fn test_submission_body_carries_model_input() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, SUBMITTED);
    let (client, _) = create_test_client(&transport, 24);
    let request = ImageRequest::new("a red cube").model(ImageModel::ZImage);

    // Act
    let task_id = client.create_task(&request.to_task_request(), None).await.unwrap();

    // Assert
    assert_eq!(task_id, "job-1");
    let sent = transport.last_request().unwrap();
    let body: serde_json::Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
    assert_eq!(body["model"], "z-image");
    assert_eq!(body["input"]["prompt"], "a red cube");
    transport.verify_header(0, "Authorization", "Bearer kie-test-key");
}

#[tokio::test]
async fn test_insufficient_credits_status_carries_hint() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(402, r#"{"code":402,"msg":"Credits insufficient"}"#);
    let (client, _) = create_test_client(&transport, 24);

    // Act
    let error = client
        .generate_image(&ImageRequest::new("a cat"), None, None)
        .await
        .unwrap_err();

    // Assert
    assert_eq!(error.kind(), ErrorKind::Http);
    assert_eq!(error.status_code(), 402);
    assert!(error.hint().contains("Insufficient credits"));
    assert!(error.to_string().starts_with("Kie API error 402: "));
    transport.verify_request_count(1);
}

#[tokio::test]
async fn test_envelope_rejection_is_api_error() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, r#"{"code":422,"msg":"model not supported"}"#);
    let (client, _) = create_test_client(&transport, 24);

    // Act
    let error = client
        .generate_image(&ImageRequest::new("a cat"), None, None)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(error, GenJobError::Api(ApiError::Rejected { code: 422, .. })));
    assert!(error.to_string().contains("model not supported"));
}

#[test]
fn test_missing_credential_makes_no_request() {
    // Arrange
    let transport = MockHttpTransport::new();

    // Act
    let error = KieConfig::from_lookup(|_| None)
        .and_then(|config| {
            KieClient::builder()
                .config(config)
                .transport(Arc::new(transport.clone()))
                .logger(Arc::new(NoopLogger))
                .build()
        })
        .unwrap_err();

    // Assert
    assert_eq!(error.kind(), ErrorKind::Configuration);
    assert_eq!(error.to_string(), "Configuration error: KIE_API_KEY not set");
    assert!(error.hint().contains("https://kie.ai/api-key"));
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_poll_budget_exhaustion() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, SUBMITTED);
    for _ in 0..3 {
        transport.enqueue_json_response(200, GENERATING);
    }
    let (client, clock) = create_test_client(&transport, 3);

    // Act
    let error = client
        .generate_image(&ImageRequest::new("a cat"), None, None)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(
        error,
        GenJobError::Timeout(TimeoutError::PollExhausted { attempts: 3, .. })
    ));
    assert_eq!(error.to_string(), "Timeout after 15s waiting for task job-1");
    transport.verify_request_count(4);
    assert_eq!(clock.sleeps().len(), 2);
}

#[tokio::test]
async fn test_failed_job_reports_provider_message() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, SUBMITTED);
    transport.enqueue_json_response(
        200,
        r#"{"code":200,"msg":"success","data":{"taskId":"job-1","state":"fail","failMsg":"content policy"}}"#,
    );
    let (client, clock) = create_test_client(&transport, 24);

    // Act
    let error = client
        .generate_image(&ImageRequest::new("a cat"), None, None)
        .await
        .unwrap_err();

    // Assert
    assert_eq!(error.to_string(), "Generation failed: content policy");
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn test_success_without_result_json() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, SUBMITTED);
    transport.enqueue_json_response(200, r#"{"code":200,"msg":"success","data":{"taskId":"job-1","state":"success"}}"#);
    let (client, _) = create_test_client(&transport, 24);

    // Act
    let error = client.poll_result("job-1", None, None).await.unwrap_err();

    // Assert
    assert!(matches!(
        error,
        GenJobError::Response(ResponseError::MissingResult { ref task_id }) if task_id == "job-1"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_poll_sleep() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, SUBMITTED);
    for _ in 0..5 {
        transport.enqueue_json_response(200, GENERATING);
    }
    let client = KieClient::builder()
        .config(test_config(24))
        .transport(Arc::new(transport.clone()))
        .clock(Arc::new(SystemClock))
        .logger(Arc::new(NoopLogger))
        .build()
        .unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        trigger.cancel();
    });
    let started = tokio::time::Instant::now();

    // Act
    let error = client
        .generate_image(&ImageRequest::new("a cat"), None, Some(&cancel))
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(error, GenJobError::Cancelled { point: CancelPoint::PollSleep }));
    assert!(started.elapsed() < Duration::from_secs(5));
    transport.verify_request_count(2);
}

#[tokio::test]
async fn test_already_cancelled_token_skips_network() {
    // Arrange
    let transport = MockHttpTransport::new();
    let (client, _) = create_test_client(&transport, 24);
    let cancel = CancellationToken::new();
    cancel.cancel();

    // Act
    let error = client.check_credits(Some(&cancel)).await.unwrap_err();

    // Assert
    assert!(error.is_cancelled());
    transport.verify_request_count(0);
}

#[tokio::test]
async fn test_check_credits() {
    // Arrange
    let transport = MockHttpTransport::new();
    transport.enqueue_json_response(200, r#"{"code":200,"msg":"success","data":42.5}"#);
    let (client, _) = create_test_client(&transport, 24);

    // Act
    let credits = client.check_credits(None).await.unwrap();

    // Assert
    assert!((credits - 42.5).abs() < f64::EPSILON);
    transport.verify_request(0, HttpMethod::Get, "/api/v1/chat/credit");
}

#[test]
fn test_model_catalog_marks_default() {
    // Arrange
    let transport = MockHttpTransport::new();
    let (client, _) = create_test_client(&transport, 24);

    // Act
    let models = client.list_models(None);

    // Assert
    assert_eq!(models.len(), ImageModel::ALL.len());
    assert_eq!(models.iter().filter(|m| m.is_default).count(), 1);
    transport.verify_request_count(0);
}
