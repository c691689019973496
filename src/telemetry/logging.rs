//! Logging
//!
//! Diagnostic sink for token lifecycle events. Production output goes
//! through `tracing`; tests capture entries in memory.

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
        }
    }
}

/// Fields attached to a log message.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    /// Profile name.
    pub profile: Option<String>,
    /// Lifecycle step (load, refresh, acquire, request).
    pub operation: Option<String>,
    /// Grant type in use.
    pub grant_type: Option<String>,
    /// Additional fields, ordered by key.
    pub extra: BTreeMap<String, String>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// `key=value` pairs, space separated.
    fn fields(&self) -> String {
        let named = [
            ("profile", &self.profile),
            ("operation", &self.operation),
            ("grant_type", &self.grant_type),
        ];
        named
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={}", key, v)))
            .chain(self.extra.iter().map(|(k, v)| format!("{}={}", k, v)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Logger interface.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str, context: &LogContext);

    fn info(&self, message: &str, context: &LogContext);

    fn warn(&self, message: &str, context: &LogContext);

    /// Whether messages at `level` are kept.
    fn is_enabled(&self, level: LogLevel) -> bool;
}

/// Logger forwarding to `tracing` events.
///
/// Whether anything is written is decided by the installed subscriber.
#[derive(Debug, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str, context: &LogContext) {
        tracing::debug!(context = %context.fields(), "{}", message);
    }

    fn info(&self, message: &str, context: &LogContext) {
        tracing::info!(context = %context.fields(), "{}", message);
    }

    fn warn(&self, message: &str, context: &LogContext) {
        tracing::warn!(context = %context.fields(), "{}", message);
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Debug => tracing::enabled!(tracing::Level::DEBUG),
            LogLevel::Info => tracing::enabled!(tracing::Level::INFO),
            LogLevel::Warn => tracing::enabled!(tracing::Level::WARN),
        }
    }
}

/// Captured log message.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub context: LogContext,
}

/// In-memory logger for testing.
pub struct InMemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
    min_level: LogLevel,
}

impl InMemoryLogger {
    /// Capture every level.
    pub fn new() -> Self {
        Self::with_level(LogLevel::Debug)
    }

    /// Capture `min_level` and above.
    pub fn with_level(min_level: LogLevel) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            min_level,
        }
    }

    pub fn get_entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn get_entries_by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    fn log(&self, level: LogLevel, message: &str, context: &LogContext) {
        if self.is_enabled(level) {
            self.entries.lock().unwrap().push(LogEntry {
                level,
                message: message.to_string(),
                context: context.clone(),
            });
        }
    }
}

impl Default for InMemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for InMemoryLogger {
    fn debug(&self, message: &str, context: &LogContext) {
        self.log(LogLevel::Debug, message, context);
    }

    fn info(&self, message: &str, context: &LogContext) {
        self.log(LogLevel::Info, message, context);
    }

    fn warn(&self, message: &str, context: &LogContext) {
        self.log(LogLevel::Warn, message, context);
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}
