//! Structured logging for the provider clients.
//!
//! Provides trait-based logging with structured field support. Sensitive
//! fields are redacted before anything reaches `tracing`.

use serde_json::Value;

/// Log level for a logger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// General information.
    #[default]
    Info,
    /// Detailed information.
    Debug,
}

/// Logger trait for structured logging.
pub trait Logger: Send + Sync {
    /// Log a debug message with structured context.
    fn debug(&self, message: &str, fields: Value);

    /// Log an info message with structured context.
    fn info(&self, message: &str, fields: Value);

    /// Log a warning message with structured context.
    fn warn(&self, message: &str, fields: Value);

    /// Log an error message with structured context.
    fn error(&self, message: &str, fields: Value);
}

const SENSITIVE_KEYS: &[&str] = &[
    "api_key",
    "apiKey",
    "key",
    "token",
    "access_token",
    "accessToken",
    "secret",
    "password",
    "credential",
    "authorization",
    "Authorization",
    "auth",
];

const REDACTED: &str = "***REDACTED***";

/// Structured logger emitting `tracing` events.
///
/// ```
/// use integrations_genjob::observability::{Logger, StructuredLogger};
///
/// let logger = StructuredLogger::new("genjob.kie");
/// logger.info("Task created", serde_json::json!({"task_id": "job-1"}));
/// ```
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    name: String,
    level: LogLevel,
}

impl StructuredLogger {
    /// Create a new structured logger with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: LogLevel::Info,
        }
    }

    /// Set the minimum log level for this logger.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Logger name, emitted as the `logger` field.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level <= self.level
    }
}

/// Masks credential-like fields, recursing into nested objects and arrays.
pub(crate) fn redact_sensitive_fields(mut fields: Value) -> Value {
    match &mut fields {
        Value::Object(obj) => {
            for (key, value) in obj.iter_mut() {
                if SENSITIVE_KEYS.contains(&key.as_str()) {
                    *value = Value::String(REDACTED.to_string());
                } else if value.is_object() || value.is_array() {
                    *value = redact_sensitive_fields(value.take());
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                *item = redact_sensitive_fields(item.take());
            }
        }
        _ => {}
    }
    fields
}

impl Logger for StructuredLogger {
    fn debug(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Debug) {
            return;
        }
        let fields = redact_sensitive_fields(fields);
        tracing::debug!(logger = %self.name, fields = %fields, "{}", message);
    }

    fn info(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Info) {
            return;
        }
        let fields = redact_sensitive_fields(fields);
        tracing::info!(logger = %self.name, fields = %fields, "{}", message);
    }

    fn warn(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Warn) {
            return;
        }
        let fields = redact_sensitive_fields(fields);
        tracing::warn!(logger = %self.name, fields = %fields, "{}", message);
    }

    fn error(&self, message: &str, fields: Value) {
        let fields = redact_sensitive_fields(fields);
        tracing::error!(logger = %self.name, fields = %fields, "{}", message);
    }
}

/// Logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str, _fields: Value) {}
    fn info(&self, _message: &str, _fields: Value) {}
    fn warn(&self, _message: &str, _fields: Value) {}
    fn error(&self, _message: &str, _fields: Value) {}
}
