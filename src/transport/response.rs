//! HTTP response parsing.
//!
//! Successful bodies are deserialized into the expected type. Every non-2xx
//! response is handed to the provider's [`ErrorClassifier`] so the caller
//! receives a hint alongside the message.

use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::http::HttpResponse;
use crate::error::{ErrorClassifier, GenJobError};

/// Parser for HTTP responses.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses a response into `T`, classifying non-2xx statuses.
    pub fn parse_response<T: DeserializeOwned>(
        response: HttpResponse,
        classifier: &ErrorClassifier,
    ) -> Result<T, GenJobError> {
        if response.is_success() {
            let parsed: T = serde_json::from_slice(&response.body)?;
            Ok(parsed)
        } else {
            Err(Self::parse_error_response(&response, classifier))
        }
    }

    /// Maps a failed response to a classified error.
    pub fn parse_error_response(response: &HttpResponse, classifier: &ErrorClassifier) -> GenJobError {
        let error = classifier.to_error(response.status, &response.body);

        if let Some(id) = Self::extract_request_id(&response.headers) {
            tracing::debug!(
                request_id = %id,
                status = response.status,
                provider = classifier.provider(),
                "API error occurred"
            );
        }

        error
    }

    /// Returns the provider request id, if present.
    pub fn extract_request_id(headers: &HashMap<String, String>) -> Option<String> {
        let possible_headers = ["x-request-id", "x-goog-request-id", "request-id"];

        headers
            .iter()
            .find(|(key, _)| possible_headers.contains(&key.to_lowercase().as_str()))
            .map(|(_, value)| value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use bytes::Bytes;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct TestResponse {
        name: String,
        value: i32,
    }

    fn create_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn test_parse_successful_response() {
        let response = create_response(200, r#"{"name":"test","value":42}"#);
        let parsed: TestResponse =
            ResponseParser::parse_response(response, &ErrorClassifier::KIE).unwrap();

        assert_eq!(parsed.name, "test");
        assert_eq!(parsed.value, 42);
    }

    #[test]
    fn test_parse_402_carries_hint() {
        let response = create_response(402, r#"{"msg":"insufficient"}"#);
        let error =
            ResponseParser::parse_response::<TestResponse>(response, &ErrorClassifier::KIE).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Http);
        assert_eq!(error.status_code(), 402);
        assert!(error.hint().contains("Insufficient credits"));
    }

    #[test]
    fn test_malformed_body_is_response_error() {
        let response = create_response(200, "not json");
        let error =
            ResponseParser::parse_response::<TestResponse>(response, &ErrorClassifier::GEMINI).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Response);
    }

    #[test]
    fn test_extract_request_id() {
        let mut headers = HashMap::new();
        headers.insert("X-Request-Id".to_string(), "req-1".to_string());
        assert_eq!(ResponseParser::extract_request_id(&headers), Some("req-1".to_string()));
    }
}
