//! Logging setup and the per-invocation logging context.
//!
//! The process-wide logger is installed once at startup with
//! [`initialize_logging`]. Everything an invocation logs goes through a
//! [`LogContext`] that is built for that invocation and passed down
//! explicitly. The context tags each line with the request id and applies its
//! own level threshold, so no invocation ever mutates global logger state.

use std::fmt::Display;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use log::{Level, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use crate::constants::NOISY_LOG_TARGETS;

/// Install the process-wide logger.
///
/// SDK and HTTP internals are filtered out; the per-invocation threshold is
/// applied by [`LogContext`].
pub fn initialize_logging(level: LevelFilter) -> Result<()> {
    let mut builder = ConfigBuilder::new();
    for target in NOISY_LOG_TARGETS {
        builder.add_filter_ignore_str(target);
    }
    TermLogger::init(
        level,
        builder.build(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// A log line recorded by a capturing [`LogContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
}

/// Logging context scoped to one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    request_id: String,
    function_arn: Option<String>,
    deadline_ms: Option<u64>,
    max_level: LevelFilter,
    captured: Option<Arc<Mutex<Vec<LogEntry>>>>,
}

impl LogContext {
    pub fn new(request_id: impl Into<String>, max_level: LevelFilter) -> Self {
        LogContext {
            request_id: request_id.into(),
            function_arn: None,
            deadline_ms: None,
            max_level,
            captured: None,
        }
    }

    /// A context that also records every emitted line, for inspection in tests.
    pub fn capturing(request_id: impl Into<String>, max_level: LevelFilter) -> Self {
        let mut ctx = Self::new(request_id, max_level);
        ctx.captured = Some(Arc::new(Mutex::new(Vec::new())));
        ctx
    }

    pub fn with_function_arn(mut self, function_arn: impl Into<String>) -> Self {
        self.function_arn = Some(function_arn.into());
        self
    }

    pub fn with_deadline(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    pub fn log(&self, level: Level, message: impl Display) {
        if level > self.max_level {
            return;
        }
        let message = message.to_string();
        log::log!(level, "[{}] {}", self.request_id, message);
        if let Some(captured) = &self.captured {
            if let Ok(mut entries) = captured.lock() {
                entries.push(LogEntry { level, message });
            }
        }
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, message);
    }

    /// Lines recorded so far; empty unless built with [`LogContext::capturing`].
    pub fn entries(&self) -> Vec<LogEntry> {
        self.captured
            .as_ref()
            .and_then(|captured| captured.lock().ok().map(|entries| entries.clone()))
            .unwrap_or_default()
    }

    /// Entries recorded at exactly `level`.
    pub fn entries_at(&self, level: Level) -> Vec<LogEntry> {
        self.entries().into_iter().filter(|e| e.level == level).collect()
    }

    /// The invocation context, rendered for unexpected-failure reports.
    pub fn describe(&self) -> String {
        format!(
            "request_id={} function_arn={} deadline_ms={}",
            self.request_id,
            self.function_arn.as_deref().unwrap_or("-"),
            self.deadline_ms.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
        )
    }
}
