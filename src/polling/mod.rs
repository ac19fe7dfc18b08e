//! Bounded poll loop for submit/poll job APIs.
//!
//! Each iteration checks cancellation, fetches the job status once, and
//! either returns (success, failure) or reports progress and sleeps. After
//! `max_attempts` non-terminal observations the loop gives up with a timeout
//! error. No sleep follows the final attempt.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, CancelPoint, GenJobError, GenJobResult, ResponseError, TimeoutError};
use crate::extract::decode_url_result;
use crate::resilience::{sleep_or_cancel, Clock, SystemClock};
use crate::types::{GenerationResult, Job, JobState, TaskRecord};

/// Default delay between status calls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default number of status calls before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 24;

/// Poll cadence and attempt ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status calls.
    pub interval: Duration,
    /// Maximum status calls.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollConfig {
    /// Creates a poll configuration.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, max_attempts }
    }

    /// Nominal budget: `max_attempts × interval`.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

/// Progress notification for one non-terminal observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollProgress {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Attempt ceiling.
    pub total: u32,
    /// Observed state.
    pub state: JobState,
}

/// Receives progress notifications while a job is in flight.
pub trait ProgressObserver: Send + Sync {
    /// Called after each non-terminal status observation.
    fn on_progress(&self, progress: &PollProgress);
}

impl<F> ProgressObserver for F
where
    F: Fn(&PollProgress) + Send + Sync,
{
    fn on_progress(&self, progress: &PollProgress) {
        self(progress);
    }
}

/// Source of job status observations.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    /// Fetches the current status of `task_id`.
    async fn fetch_status(
        &self,
        task_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<TaskRecord>;
}

/// Drives a [`JobStatusSource`] until the job finishes.
#[derive(Clone)]
pub struct PollLoop {
    config: PollConfig,
    clock: Arc<dyn Clock>,
}

impl PollLoop {
    /// Poll loop on the tokio clock.
    pub fn new(config: PollConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Poll loop reading time from `clock`.
    pub fn with_clock(config: PollConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Polls `task_id` until success, failure, cancellation or exhaustion.
    pub async fn run(
        &self,
        source: &dyn JobStatusSource,
        task_id: &str,
        observer: Option<&dyn ProgressObserver>,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<GenerationResult> {
        let is_cancelled = || cancel.is_some_and(CancellationToken::is_cancelled);
        let total = self.config.max_attempts;
        let mut job = Job::new(task_id, self.clock.now());

        for attempt in 1..=total {
            if is_cancelled() {
                return Err(GenJobError::cancelled(CancelPoint::BeforePoll));
            }

            let record = match source.fetch_status(task_id, cancel).await {
                Ok(record) => record,
                Err(_) if is_cancelled() => {
                    return Err(GenJobError::cancelled(CancelPoint::Request));
                }
                Err(e) => return Err(e),
            };
            job.observe(record.state.clone());

            match record.state {
                JobState::Success => return Self::finish(task_id, record.result_json.as_deref()),
                JobState::Fail => {
                    let message = record
                        .fail_msg
                        .filter(|msg| !msg.is_empty())
                        .unwrap_or_else(|| "unknown error".to_string());
                    tracing::warn!(task_id, attempt, error = %message, "Generation failed");
                    return Err(ApiError::GenerationFailed {
                        task_id: task_id.to_string(),
                        message,
                    }
                    .into());
                }
                state => {
                    tracing::debug!(task_id, attempt, total, state = %state, "Poll");
                    if let Some(observer) = observer {
                        observer.on_progress(&PollProgress { attempt, total, state });
                    }
                }
            }

            if attempt < total {
                sleep_or_cancel(self.clock.as_ref(), self.config.interval, cancel, CancelPoint::PollSleep)
                    .await?;
            }
        }

        tracing::warn!(
            task_id,
            attempts = job.attempts,
            waited_ms = (self.clock.now() - job.submitted_at).as_millis() as u64,
            "Poll budget exhausted"
        );

        Err(TimeoutError::PollExhausted {
            task_id: task_id.to_string(),
            attempts: total,
            elapsed: self.config.budget(),
        }
        .into())
    }

    fn finish(task_id: &str, result_json: Option<&str>) -> GenJobResult<GenerationResult> {
        match result_json {
            Some(raw) if !raw.trim().is_empty() => decode_url_result(task_id, raw),
            _ => Err(ResponseError::MissingResult {
                task_id: task_id.to_string(),
            }
            .into()),
        }
    }
}

impl std::fmt::Debug for PollLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollLoop").field("config", &self.config).finish_non_exhaustive()
    }
}
