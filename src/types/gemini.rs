//! Gemini generateContent request and response types, restricted to image output.

use serde::{Deserialize, Serialize};

/// Request body for image generation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    /// Prompt contents.
    pub contents: Vec<PromptContent>,
    /// Output configuration.
    pub generation_config: GenerationConfig,
}

impl GenerateImageRequest {
    /// Builds a single-prompt request asking for image and text output.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![PromptContent {
                parts: vec![PromptPart { text: prompt.into() }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
            },
        }
    }
}

/// One content block of the prompt.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PromptContent {
    /// Text parts.
    pub parts: Vec<PromptPart>,
}

/// Text part of the prompt.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PromptPart {
    /// Prompt text.
    pub text: String,
}

/// Generation configuration.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Requested output modalities.
    pub response_modalities: Vec<String>,
}

/// Response body of generateContent.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateImageResponse {
    /// Candidates; absent when the prompt was blocked.
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
    /// Error reported inside a 2xx body.
    #[serde(default)]
    pub error: Option<EmbeddedError>,
}

/// One response candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate content.
    #[serde(default)]
    pub content: Option<CandidateContent>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CandidateContent {
    /// Response parts.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
    /// Author role.
    #[serde(default)]
    pub role: Option<String>,
}

/// A response part: text, inline data, or both absent.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    /// Text output.
    #[serde(default)]
    pub text: Option<String>,
    /// Binary output.
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

/// Base64 payload with its media type.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// Media type, e.g. `image/png`.
    pub mime_type: String,
    /// Standard base64.
    pub data: String,
}

/// Error object embedded in a 2xx body.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddedError {
    /// Numeric code.
    #[serde(default)]
    pub code: i64,
    /// Message.
    #[serde(default)]
    pub message: String,
    /// Symbolic status.
    #[serde(default)]
    pub status: Option<String>,
}
