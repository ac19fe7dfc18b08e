//! Kie.ai job submission and status service.

mod service;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::GenJobResult;
use crate::types::{CreateTaskRequest, TaskRecord};

pub use service::TasksServiceImpl;

/// Service for submitting jobs and reading their status.
#[async_trait]
pub trait TasksService: Send + Sync {
    /// Submits a job and returns its id.
    async fn create_task(
        &self,
        request: &CreateTaskRequest,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<String>;

    /// Reads the current status of a job.
    async fn get_task(&self, task_id: &str, cancel: Option<&CancellationToken>) -> GenJobResult<TaskRecord>;
}
