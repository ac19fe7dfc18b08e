//! Kie.ai credit balance envelope.

use serde::Deserialize;

/// Envelope returned by the credit balance call.
///
/// `data` is the remaining balance as a bare number; it may be null when
/// `code` reports a failure.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreditEnvelope {
    /// Application status; 200 on success.
    pub code: i64,
    /// Provider message.
    #[serde(default, alias = "message")]
    pub msg: String,
    /// Remaining credits.
    #[serde(default)]
    pub data: Option<f64>,
}
