//! Caller-facing generation result.

use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Largest inline payload a caller should embed directly (700 KiB).
pub const DEFAULT_MAX_INLINE_BYTES: usize = 700 * 1024;

/// Output of a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPayload {
    /// Hosted output URLs, never empty.
    Urls(Vec<String>),
    /// Decoded binary along with the base64 it came from.
    Inline {
        /// Original base64 text.
        base64: String,
        /// Decoded bytes.
        bytes: Bytes,
    },
}

/// Terminal success artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// URLs or inline bytes.
    pub payload: ResultPayload,
    /// Media type, when the provider reports one.
    pub media_type: Option<String>,
    /// Where the bytes were written, for inline payloads.
    pub stored_at: Option<PathBuf>,
    /// Raw `resultJson` length for URL results; decoded length for inline ones.
    pub size_bytes: usize,
}

impl GenerationResult {
    /// Output URLs; empty for inline payloads.
    pub fn urls(&self) -> &[String] {
        match &self.payload {
            ResultPayload::Urls(urls) => urls,
            ResultPayload::Inline { .. } => &[],
        }
    }

    /// Decoded bytes, for inline payloads.
    pub fn bytes(&self) -> Option<&Bytes> {
        match &self.payload {
            ResultPayload::Inline { bytes, .. } => Some(bytes),
            ResultPayload::Urls(_) => None,
        }
    }

    /// Base64 text, for inline payloads.
    pub fn base64(&self) -> Option<&str> {
        match &self.payload {
            ResultPayload::Inline { base64, .. } => Some(base64),
            ResultPayload::Urls(_) => None,
        }
    }

    /// Storage path, for persisted payloads.
    pub fn stored_at(&self) -> Option<&Path> {
        self.stored_at.as_deref()
    }

    /// True when the payload is inline and no larger than `limit` bytes.
    pub fn fits_inline(&self, limit: usize) -> bool {
        matches!(self.payload, ResultPayload::Inline { .. }) && self.size_bytes <= limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(size: usize) -> GenerationResult {
        GenerationResult {
            payload: ResultPayload::Inline {
                base64: String::new(),
                bytes: Bytes::from(vec![0u8; size]),
            },
            media_type: Some("image/png".to_string()),
            stored_at: None,
            size_bytes: size,
        }
    }

    #[test]
    fn test_fits_inline_limit() {
        assert!(inline(DEFAULT_MAX_INLINE_BYTES).fits_inline(DEFAULT_MAX_INLINE_BYTES));
        assert!(!inline(DEFAULT_MAX_INLINE_BYTES + 1).fits_inline(DEFAULT_MAX_INLINE_BYTES));
    }

    #[test]
    fn test_url_result_accessors() {
        let result = GenerationResult {
            payload: ResultPayload::Urls(vec!["https://x/1.png".to_string()]),
            media_type: None,
            stored_at: None,
            size_bytes: 36,
        };

        assert_eq!(result.urls(), ["https://x/1.png".to_string()]);
        assert!(result.bytes().is_none());
        assert!(!result.fits_inline(DEFAULT_MAX_INLINE_BYTES));
    }
}
