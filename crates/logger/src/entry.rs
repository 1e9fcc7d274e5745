//! Log entries and their two output formats

use serde_json::{Map, Value};
use types::{EnvironmentKind, LogLevel};

/// Structured key/value context attached to a log call
pub type Context = Map<String, Value>;

const UNSERIALIZABLE_CONTEXT: &str = "[unserializable context]";

/// Build a context from a JSON value.
///
/// Objects are used as-is; any other value is stored under `"value"`.
pub fn context(value: Value) -> Context {
    match value {
        Value::Object(map) => map,
        Value::Null => Context::new(),
        other => {
            let mut map = Context::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// Error attached to a log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// A real error value and the messages of its source chain
    Error { message: String, causes: Vec<String> },
    /// Anything that is not an error type, already stringified
    Message(String),
}

impl LogError {
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        LogError::Error {
            message: err.to_string(),
            causes,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LogError::Error { message, .. } => message,
            LogError::Message(message) => message,
        }
    }

    pub fn causes(&self) -> &[String] {
        match self {
            LogError::Error { causes, .. } => causes,
            LogError::Message(_) => &[],
        }
    }

    fn render(&self) -> String {
        let mut out = self.message().to_string();
        for cause in self.causes() {
            out.push_str("\n  Caused by: ");
            out.push_str(cause);
        }
        out
    }
}

impl From<String> for LogError {
    fn from(message: String) -> Self {
        LogError::Message(message)
    }
}

impl From<&str> for LogError {
    fn from(message: &str) -> Self {
        LogError::Message(message.to_string())
    }
}

/// A single log call, alive only while it is being formatted
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: String,
    pub context: Option<Context>,
    pub error: Option<LogError>,
}

impl LogEntry {
    /// Human-readable in development, one JSON line otherwise
    pub fn format(&self, kind: EnvironmentKind) -> String {
        if kind.is_development() {
            self.format_pretty()
        } else {
            self.format_structured()
        }
    }

    pub fn format_pretty(&self) -> String {
        let mut out = format!("[{}] {}: {}", self.timestamp, self.level.label(), self.message);

        if let Some(ref context) = self.context {
            let rendered = serde_json::to_string_pretty(context)
                .unwrap_or_else(|_| UNSERIALIZABLE_CONTEXT.to_string());
            out.push_str("\nContext: ");
            out.push_str(&rendered);
        }

        if let Some(ref error) = self.error {
            out.push_str("\nError: ");
            out.push_str(&error.render());
        }

        out
    }

    pub fn format_structured(&self) -> String {
        let mut record = Map::new();
        record.insert("timestamp".to_string(), Value::from(self.timestamp.as_str()));
        record.insert("level".to_string(), Value::from(self.level.as_str()));
        record.insert("message".to_string(), Value::from(self.message.as_str()));

        if let Some(ref context) = self.context {
            record.insert("context".to_string(), Value::Object(context.clone()));
        }

        if let Some(ref error) = self.error {
            record.insert("error".to_string(), Value::from(error.message()));
            if !error.causes().is_empty() {
                record.insert("causes".to_string(), Value::from(error.causes().to_vec()));
            }
        }

        serde_json::to_string(&record).unwrap_or_else(|_| {
            format!(
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":\"{}\"}}",
                self.timestamp,
                self.level.as_str(),
                UNSERIALIZABLE_CONTEXT
            )
        })
    }
}
