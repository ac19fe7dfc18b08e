//! Endpoint path constants and builders.

/// Kie.ai job submission.
pub const KIE_CREATE_TASK: &str = "/api/v1/jobs/createTask";

/// Kie.ai job status lookup.
pub const KIE_RECORD_INFO: &str = "/api/v1/jobs/recordInfo";

/// Kie.ai credit balance.
pub const KIE_CREDITS: &str = "/api/v1/chat/credit";

/// Constructs the Kie.ai status path for a task.
///
/// ```
/// use integrations_genjob::transport::endpoints;
///
/// assert_eq!(endpoints::record_info("job-1"), "/api/v1/jobs/recordInfo?taskId=job-1");
/// ```
pub fn record_info(task_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(task_id.as_bytes()).collect();
    format!("{KIE_RECORD_INFO}?taskId={encoded}")
}

/// Constructs the Gemini generateContent path for a model.
///
/// ```
/// use integrations_genjob::transport::endpoints;
///
/// let path = endpoints::generate_content("v1beta", "gemini-pro");
/// assert_eq!(path, "/v1beta/models/gemini-pro:generateContent");
/// ```
pub fn generate_content(api_version: &str, model: &str) -> String {
    format!("/{api_version}/models/{model}:generateContent")
}
