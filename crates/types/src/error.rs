//! Error types for the Template App runtime

use thiserror::Error;

/// Main error type for the template runtime
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Environment failed validation at startup
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    /// HTTP server setup or runtime errors
    #[error("Server error: {0}")]
    Server(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for template runtime operations
pub type Result<T> = std::result::Result<T, TemplateError>;

/// A single violated environment field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct FieldError {
    /// Raw environment key, e.g. `NEXT_PUBLIC_APP_URL`
    pub field: String,
    /// Human-readable reason the value was rejected
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Fatal startup error raised when the process environment is invalid.
///
/// Carries every violated field, not just the first one encountered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Environment validation failed:\n{}", join_lines(.errors))]
pub struct ConfigurationError {
    pub errors: Vec<FieldError>,
}

impl ConfigurationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Names of all fields that failed validation
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn join_lines(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
