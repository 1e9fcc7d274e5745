//! Per-level output sinks

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Mutex;
use types::LogLevel;

/// Destination for formatted log lines.
///
/// Each level is routed to its own stream; implementations must not panic
/// or report failures back to the caller.
pub trait LogSink: Send + Sync {
    fn write(&self, level: LogLevel, line: &str);
}

/// Writes debug and info to stdout, warn and error to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Whether a level is routed to stderr
    pub fn uses_stderr(level: LogLevel) -> bool {
        matches!(level, LogLevel::Warn | LogLevel::Error)
    }
}

impl LogSink for ConsoleSink {
    fn write(&self, level: LogLevel, line: &str) {
        // Broken pipes and closed streams are ignored
        let _ = if Self::uses_stderr(level) {
            writeln!(io::stderr().lock(), "{line}")
        } else {
            writeln!(io::stdout().lock(), "{line}")
        };
    }
}

/// Captures lines in memory, one buffer per level
#[derive(Debug, Default)]
pub struct MemorySink {
    streams: Mutex<HashMap<LogLevel, Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written at exactly this level
    pub fn lines(&self, level: LogLevel) -> Vec<String> {
        let streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        streams.get(&level).cloned().unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        let streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        streams.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn clear(&self) {
        let mut streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        streams.clear();
    }
}

impl LogSink for MemorySink {
    fn write(&self, level: LogLevel, line: &str) {
        let mut streams = self.streams.lock().unwrap_or_else(|e| e.into_inner());
        streams.entry(level).or_default().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_routing_is_fixed() {
        assert!(!ConsoleSink::uses_stderr(LogLevel::Debug));
        assert!(!ConsoleSink::uses_stderr(LogLevel::Info));
        assert!(ConsoleSink::uses_stderr(LogLevel::Warn));
        assert!(ConsoleSink::uses_stderr(LogLevel::Error));
    }

    #[test]
    fn test_memory_sink_separates_levels() {
        let sink = MemorySink::new();
        sink.write(LogLevel::Info, "one");
        sink.write(LogLevel::Error, "two");
        sink.write(LogLevel::Info, "three");

        assert_eq!(sink.lines(LogLevel::Info), vec!["one", "three"]);
        assert_eq!(sink.lines(LogLevel::Error), vec!["two"]);
        assert!(sink.lines(LogLevel::Debug).is_empty());
        assert_eq!(sink.total(), 3);

        sink.clear();
        assert!(sink.is_empty());
    }
}
