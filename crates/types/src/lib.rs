//! Shared types for the Template App runtime
//!
//! This crate contains the environment enums and the error taxonomy shared by
//! the configuration pipeline, the logger and the HTTP server.

pub mod environment;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use environment::{EnvironmentKind, LogLevel};
pub use error::{ConfigurationError, FieldError, Result, TemplateError};
