//! Observability: structured logging with secret redaction.

mod logging;

pub use logging::{LogLevel, Logger, NoopLogger, StructuredLogger};
