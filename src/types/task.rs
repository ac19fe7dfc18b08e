//! Kie.ai job submission and status types.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

/// Body of the job submission call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateTaskRequest {
    /// Model id.
    pub model: String,
    /// Model-specific input mapping.
    pub input: serde_json::Value,
}

/// Envelope returned by the submission call.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskEnvelope {
    /// Application status; 200 on success.
    pub code: i64,
    /// Provider message.
    #[serde(default, alias = "message")]
    pub msg: String,
    /// Payload, absent on failure.
    #[serde(default)]
    pub data: Option<TaskCreated>,
}

/// Payload of a successful submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreated {
    /// Job id.
    pub task_id: String,
}

/// Envelope returned by the status call.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordEnvelope {
    /// Application status; 200 on success.
    pub code: i64,
    /// Provider message.
    #[serde(default, alias = "message")]
    pub msg: String,
    /// Payload, absent on failure.
    #[serde(default)]
    pub data: Option<TaskRecord>,
}

/// Decoded job status.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Job id.
    pub task_id: String,
    /// Current state.
    pub state: JobState,
    /// JSON-encoded result; only meaningful in `success`.
    #[serde(default)]
    pub result_json: Option<String>,
    /// Failure reason; only meaningful in `fail`.
    #[serde(default)]
    pub fail_msg: Option<String>,
}

impl TaskRecord {
    /// Creates a record with no result or failure message.
    pub fn new(task_id: impl Into<String>, state: JobState) -> Self {
        Self {
            task_id: task_id.into(),
            state,
            result_json: None,
            fail_msg: None,
        }
    }

    /// Sets the result JSON.
    pub fn with_result_json(mut self, result_json: impl Into<String>) -> Self {
        self.result_json = Some(result_json.into());
        self
    }

    /// Sets the failure message.
    pub fn with_fail_msg(mut self, fail_msg: impl Into<String>) -> Self {
        self.fail_msg = Some(fail_msg.into());
        self
    }
}

/// Remote job state.
///
/// Labels other than the five known ones are kept verbatim and treated as
/// still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JobState {
    /// Accepted, not yet queued.
    Waiting,
    /// Queued.
    Queuing,
    /// Running.
    Generating,
    /// Finished with a result.
    Success,
    /// Finished with an error.
    Fail,
    /// Unrecognized label.
    Unknown(String),
}

impl JobState {
    /// Returns true for `success` and `fail`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Success | JobState::Fail)
    }

    /// Wire label.
    pub fn as_str(&self) -> &str {
        match self {
            JobState::Waiting => "waiting",
            JobState::Queuing => "queuing",
            JobState::Generating => "generating",
            JobState::Success => "success",
            JobState::Fail => "fail",
            JobState::Unknown(label) => label,
        }
    }
}

impl From<String> for JobState {
    fn from(label: String) -> Self {
        match label.as_str() {
            "waiting" => JobState::Waiting,
            "queuing" => JobState::Queuing,
            "generating" => JobState::Generating,
            "success" => JobState::Success,
            "fail" => JobState::Fail,
            _ => JobState::Unknown(label),
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted job as tracked by the poll loop.
#[derive(Debug, Clone)]
pub struct Job {
    /// Provider-issued id.
    pub id: String,
    /// When the submission returned.
    pub submitted_at: Instant,
    /// Last observed state.
    pub state: JobState,
    /// Status calls made so far.
    pub attempts: u32,
}

impl Job {
    /// Tracks a freshly submitted job.
    pub fn new(id: impl Into<String>, submitted_at: Instant) -> Self {
        Self {
            id: id.into(),
            submitted_at,
            state: JobState::Waiting,
            attempts: 0,
        }
    }

    /// Records one status observation.
    pub fn observe(&mut self, state: JobState) {
        self.attempts += 1;
        self.state = state;
    }
}
