//! Level-filtering logger with bound context

use crate::entry::{Context, LogEntry, LogError};
use crate::sink::{ConsoleSink, LogSink};
use std::fmt;
use std::sync::Arc;
use types::utils::now_iso8601;
use types::{EnvironmentKind, LogLevel};

/// Application logger.
///
/// Stateless between calls apart from what is fixed at construction, so a
/// clone can be handed to every request handler.
#[derive(Clone)]
pub struct Logger {
    kind: EnvironmentKind,
    min_level: LogLevel,
    sink: Arc<dyn LogSink>,
    bound: Context,
}

impl Logger {
    /// Logger writing to the console
    pub fn new(kind: EnvironmentKind, min_level: LogLevel) -> Self {
        Self::with_sink(kind, min_level, Arc::new(ConsoleSink))
    }

    pub fn with_sink(kind: EnvironmentKind, min_level: LogLevel, sink: Arc<dyn LogSink>) -> Self {
        Self {
            kind,
            min_level,
            sink,
            bound: Context::new(),
        }
    }

    pub fn kind(&self) -> EnvironmentKind {
        self.kind
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Context merged into every call made through this logger
    pub fn bound_context(&self) -> &Context {
        &self.bound
    }

    /// Test environments log nothing; otherwise compare level ranks
    pub fn should_log(&self, level: LogLevel) -> bool {
        if self.kind.is_test() {
            return false;
        }
        level.rank() >= self.min_level.rank()
    }

    pub fn log(
        &self,
        level: LogLevel,
        message: &str,
        context: Option<Context>,
        error: Option<LogError>,
    ) {
        if !self.should_log(level) {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            timestamp: now_iso8601(),
            context: self.merge(context),
            error,
        };

        self.sink.write(level, &entry.format(self.kind));
    }

    pub fn debug(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Debug, message, context, None);
    }

    pub fn info(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Info, message, context, None);
    }

    pub fn warn(&self, message: &str, context: Option<Context>) {
        self.log(LogLevel::Warn, message, context, None);
    }

    pub fn error(&self, message: &str, error: Option<LogError>, context: Option<Context>) {
        self.log(LogLevel::Error, message, context, error);
    }

    /// Logger that adds `context` to every call; call-site keys win on collision
    pub fn child(&self, context: Context) -> Logger {
        let mut child = self.clone();
        child.bound.extend(context);
        child
    }

    fn merge(&self, context: Option<Context>) -> Option<Context> {
        match context {
            None if self.bound.is_empty() => None,
            None => Some(self.bound.clone()),
            Some(extra) => {
                let mut merged = self.bound.clone();
                merged.extend(extra);
                Some(merged)
            }
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("kind", &self.kind)
            .field("min_level", &self.min_level)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}
