//! Integration tests for error classification.

use integrations_genjob::{
    CancelPoint, ConfigurationError, ErrorClassifier, ErrorKind, GenJobError, ResponseError,
    TimeoutError,
};
use std::time::Duration;

#[test]
fn test_kie_status_table() {
    let cases = [
        (401, "KIE_API_KEY"),
        (402, "Insufficient credits"),
        (422, "Invalid parameters"),
        (429, "Rate limited"),
        (500, "server error"),
        (503, "https://docs.kie.ai"),
    ];

    for (status, fragment) in cases {
        let error = ErrorClassifier::KIE.to_error(status, b"{}");
        assert_eq!(error.kind(), ErrorKind::Http);
        assert_eq!(error.status_code(), status);
        assert!(error.hint().contains(fragment), "status {status}: {}", error.hint());
    }
}

#[test]
fn test_gemini_status_table() {
    let cases = [
        (400, "content policy"),
        (401, "GOOGLE_API_KEY"),
        (403, "Google AI Studio"),
        (429, "10 req/min"),
        (500, "Google server error"),
        (404, "https://ai.google.dev/docs"),
    ];

    for (status, fragment) in cases {
        let classified = ErrorClassifier::GEMINI.classify(status, b"nope");
        assert!(classified.message.starts_with(&format!("Gemini API error {status}: ")));
        assert!(classified.hint.contains(fragment), "status {status}: {}", classified.hint);
    }
}

#[test]
fn test_every_error_flattens_with_a_hint() {
    let errors = vec![
        GenJobError::from(ConfigurationError::InvalidValue {
            name: "KIE_POLL_MAX_ATTEMPTS".to_string(),
            message: "must be positive".to_string(),
        }),
        GenJobError::from(ResponseError::EmptyResult {
            task_id: "job-1".to_string(),
        }),
        GenJobError::from(TimeoutError::Deadline {
            duration: Duration::from_secs(30),
        }),
        GenJobError::cancelled(CancelPoint::RateLimit),
    ];

    for error in errors {
        let classified = error.classified();
        assert_eq!(classified.message, error.to_string());
        assert!(!classified.hint.is_empty());
        assert!(classified.with_suggestion().contains("Suggestion: "));
    }
}

#[test]
fn test_cancellation_is_not_a_timeout() {
    let cancelled = GenJobError::cancelled(CancelPoint::Request);
    let timed_out = GenJobError::from(TimeoutError::Deadline {
        duration: Duration::from_secs(30),
    });

    assert_eq!(cancelled.kind(), ErrorKind::Cancelled);
    assert_eq!(timed_out.kind(), ErrorKind::Timeout);
    assert!(!timed_out.is_cancelled());
}
