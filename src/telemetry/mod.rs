//! Telemetry
//!
//! Diagnostic logging for token negotiation and request execution.

pub mod logging;

pub use logging::{InMemoryLogger, LogContext, LogEntry, LogLevel, Logger, TracingLogger};
