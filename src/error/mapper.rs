//! Maps non-2xx HTTP responses to classified errors with remediation hints.

use super::types::{ClassifiedError, GenJobError};

/// Maximum number of body characters included in an error message.
pub const MAX_ERROR_BODY_CHARS: usize = 300;

/// Static status-to-hint table for one provider.
///
/// Every non-2xx response from submission, polling, or auxiliary queries is
/// passed through the provider's classifier. Unknown codes fall back to a
/// "consult provider documentation" hint.
#[derive(Debug, Clone, Copy)]
pub struct ErrorClassifier {
    provider: &'static str,
    hints: &'static [(u16, &'static str)],
    fallback_hint: &'static str,
}

impl ErrorClassifier {
    /// Kie.ai job API.
    pub const KIE: ErrorClassifier = ErrorClassifier {
        provider: "Kie",
        hints: &[
            (401, "Check your KIE_API_KEY at https://kie.ai/api-key"),
            (402, "Insufficient credits; top up at https://kie.ai/pricing"),
            (422, "Invalid parameters; check model name and input format"),
            (429, "Rate limited; wait a few seconds and retry"),
            (500, "Kie.ai server error; try again in a few seconds"),
        ],
        fallback_hint: "Check https://docs.kie.ai for details",
    };

    /// Google Gemini image generation.
    pub const GEMINI: ErrorClassifier = ErrorClassifier {
        provider: "Gemini",
        hints: &[
            (400, "Invalid request; check your prompt (it may violate content policy)"),
            (401, "Invalid API key; check GOOGLE_API_KEY"),
            (
                403,
                "API key doesn't have access to this model; enable Gemini API in Google AI Studio",
            ),
            (429, "Rate limited; wait a minute and retry (free tier: 10 req/min)"),
            (500, "Google server error; try again in a few seconds"),
        ],
        fallback_hint: "Check https://ai.google.dev/docs for details",
    };

    /// Creates a classifier for a custom provider.
    pub const fn new(
        provider: &'static str,
        hints: &'static [(u16, &'static str)],
        fallback_hint: &'static str,
    ) -> Self {
        Self {
            provider,
            hints,
            fallback_hint,
        }
    }

    /// Provider label used in messages.
    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the hint for a status code.
    pub fn hint_for(&self, status: u16) -> &'static str {
        self.hints
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, hint)| *hint)
            .unwrap_or(self.fallback_hint)
    }

    /// Classifies a failed response.
    pub fn classify(&self, status: u16, body: &[u8]) -> ClassifiedError {
        let body = String::from_utf8_lossy(body);
        ClassifiedError::new(
            format!(
                "{} API error {}: {}",
                self.provider,
                status,
                truncate_chars(&body, MAX_ERROR_BODY_CHARS)
            ),
            status,
            self.hint_for(status),
        )
    }

    /// Classifies a failed response into the crate error type.
    pub fn to_error(&self, status: u16, body: &[u8]) -> GenJobError {
        GenJobError::Http(self.classify(status, body))
    }
}

/// Truncates `text` to at most `max` characters.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
