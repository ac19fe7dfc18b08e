//! Wire and domain types.

mod credits;
mod gemini;
mod models;
mod result;
mod task;

pub use credits::CreditEnvelope;
pub use gemini::{
    Candidate, CandidateContent, EmbeddedError, GenerateImageRequest, GenerateImageResponse,
    GenerationConfig, InlineData, PromptContent, PromptPart, ResponsePart,
};
pub use models::{
    AspectRatio, ImageModel, ImageRequest, ModelInfo, ModelKind, Quality, Resolution,
    DEFAULT_ASPECT_RATIO, DEFAULT_IMAGE_MODEL,
};
pub use result::{GenerationResult, ResultPayload, DEFAULT_MAX_INLINE_BYTES};
pub use task::{CreateTaskRequest, Job, JobState, RecordEnvelope, TaskCreated, TaskEnvelope, TaskRecord};
