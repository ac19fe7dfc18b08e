//! Decodes terminal success payloads into [`GenerationResult`]s.
//!
//! URL providers hand back a JSON string that must be decoded a second time.
//! Inline providers hand back base64 plus a media type; the bytes are written
//! to an [`ImageStore`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{GenJobResult, ResponseError, StorageError};
use crate::types::{GenerationResult, ResultPayload};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UrlResult {
    #[serde(default)]
    result_urls: Vec<String>,
}

/// Decodes a `resultJson` string into a URL result.
///
/// The list must be non-empty. `size_bytes` is the raw string length.
pub fn decode_url_result(task_id: &str, result_json: &str) -> GenJobResult<GenerationResult> {
    let parsed: UrlResult = serde_json::from_str(result_json).map_err(|e| {
        ResponseError::DeserializationError {
            message: format!("resultJson for task {task_id}: {e}"),
        }
    })?;

    if parsed.result_urls.is_empty() {
        return Err(ResponseError::EmptyResult {
            task_id: task_id.to_string(),
        }
        .into());
    }

    Ok(GenerationResult {
        payload: ResultPayload::Urls(parsed.result_urls),
        media_type: None,
        stored_at: None,
        size_bytes: result_json.len(),
    })
}

/// Strictly decodes standard-alphabet base64.
pub fn decode_base64(data: &str) -> GenJobResult<Bytes> {
    STANDARD
        .decode(data)
        .map(Bytes::from)
        .map_err(|e| ResponseError::InvalidPayload { message: e.to_string() }.into())
}

/// Decodes an inline payload and persists it through `store`.
pub async fn decode_inline(
    base64: String,
    media_type: &str,
    store: &ImageStore,
) -> GenJobResult<GenerationResult> {
    let bytes = decode_base64(&base64)?;
    let path = store.save(&bytes, media_type).await?;

    tracing::info!(
        path = %path.display(),
        size_kb = bytes.len() / 1024,
        "Image saved"
    );

    Ok(GenerationResult {
        size_bytes: bytes.len(),
        payload: ResultPayload::Inline { base64, bytes },
        media_type: Some(media_type.to_string()),
        stored_at: Some(path),
    })
}

/// File extension for a media type: `png`, `webp`, otherwise `jpg`.
pub fn extension_for(media_type: &str) -> &'static str {
    match media_type.parse::<mime::Mime>() {
        Ok(parsed) if parsed.subtype() == mime::PNG => "png",
        Ok(parsed) if parsed.subtype().as_str() == "webp" => "webp",
        Ok(_) => "jpg",
        Err(_) if media_type.contains("png") => "png",
        Err(_) if media_type.contains("webp") => "webp",
        Err(_) => "jpg",
    }
}

/// Directory that receives decoded images as `<uuid-v4>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` under a fresh name and returns the path.
    pub async fn save(&self, bytes: &[u8], media_type: &str) -> GenJobResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::CreateDir {
                path: self.dir.display().to_string(),
                message: e.to_string(),
            })?;

        let path = self
            .dir
            .join(format!("{}.{}", uuid::Uuid::new_v4(), extension_for(media_type)));

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Write {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(path)
    }
}
