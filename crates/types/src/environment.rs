//! Environment classification and log severity enums

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The deployment environment the process runs in.
///
/// Produced once from `NODE_ENV` during initialization and threaded into
/// every component that behaves differently per environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    Development,
    Production,
    Test,
}

impl EnvironmentKind {
    /// Accepted `NODE_ENV` values, in declaration order
    pub const VARIANTS: &'static [&'static str] = &["development", "production", "test"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentKind::Development => "development",
            EnvironmentKind::Production => "production",
            EnvironmentKind::Test => "test",
        }
    }

    pub fn is_development(&self) -> bool {
        *self == EnvironmentKind::Development
    }

    pub fn is_production(&self) -> bool {
        *self == EnvironmentKind::Production
    }

    pub fn is_test(&self) -> bool {
        *self == EnvironmentKind::Test
    }
}

impl Default for EnvironmentKind {
    fn default() -> Self {
        EnvironmentKind::Development
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentKind {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(EnvironmentKind::Development),
            "production" => Ok(EnvironmentKind::Production),
            "test" => Ok(EnvironmentKind::Test),
            other => Err(ParseVariantError::new(other, Self::VARIANTS)),
        }
    }
}

/// Log severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Accepted `LOG_LEVEL` values, in rank order
    pub const VARIANTS: &'static [&'static str] = &["debug", "info", "warn", "error"];

    /// Numeric rank used for threshold filtering (debug=0 .. error=3)
    pub fn rank(&self) -> u8 {
        match self {
            LogLevel::Debug => 0,
            LogLevel::Info => 1,
            LogLevel::Warn => 2,
            LogLevel::Error => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Upper-case label used in human-readable output
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ParseVariantError::new(other, Self::VARIANTS)),
        }
    }
}

/// Returned when a string is not one of an enum's accepted values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value \"{value}\", expected one of {}", .expected.join(", "))]
pub struct ParseVariantError {
    pub value: String,
    pub expected: &'static [&'static str],
}

impl ParseVariantError {
    pub fn new(value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            value: value.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_kind_flags_are_exclusive() {
        for kind in [
            EnvironmentKind::Development,
            EnvironmentKind::Production,
            EnvironmentKind::Test,
        ] {
            let flags = [kind.is_development(), kind.is_production(), kind.is_test()];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "{kind}");
        }
    }

    #[test]
    fn test_environment_kind_parse() {
        assert_eq!("production".parse::<EnvironmentKind>().unwrap(), EnvironmentKind::Production);
        assert_eq!("test".parse::<EnvironmentKind>().unwrap(), EnvironmentKind::Test);

        let err = "staging".parse::<EnvironmentKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value \"staging\", expected one of development, production, test"
        );
    }

    #[test]
    fn test_log_level_rank_and_order() {
        assert_eq!(LogLevel::Debug.rank(), 0);
        assert_eq!(LogLevel::Error.rank(), 3);
        assert!(LogLevel::Warn > LogLevel::Info);
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&EnvironmentKind::Test).unwrap();
        assert_eq!(json, "\"test\"");
        let level: LogLevel = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(level, LogLevel::Warn);
    }
}
