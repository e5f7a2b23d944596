//! Logging capability injected into checks.
//!
//! Checks report what they saw through `CanaryLog` rather than a global
//! logger. `TracingLog` forwards to `tracing`; `MemoryLog` keeps entries so
//! tests can assert on them.

use std::sync::Mutex;

/// Fire-and-forget log sink used by checks.
pub trait CanaryLog: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str, detail: Option<&str>);
}

/// Emits every entry as a `tracing` event under the `canary` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl CanaryLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!(target: "canary", "{message}");
    }

    fn error(&self, message: &str, detail: Option<&str>) {
        match detail {
            Some(detail) => tracing::error!(target: "canary", detail, "{message}"),
            None => tracing::error!(target: "canary", "{message}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub detail: Option<String>,
}

/// In-memory sink.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages(Level::Info)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Level::Error)
    }

    fn messages(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    fn push(&self, level: Level, message: &str, detail: Option<&str>) {
        self.lock().push(LogEntry {
            level,
            message: message.to_string(),
            detail: detail.map(str::to_string),
        });
    }

    // A poisoned lock still holds valid entries.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CanaryLog for MemoryLog {
    fn info(&self, message: &str) {
        self.push(Level::Info, message, None);
    }

    fn error(&self, message: &str, detail: Option<&str>) {
        self.push(Level::Error, message, detail);
    }
}
