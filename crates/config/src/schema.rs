//! Environment schema definitions
//!
//! Every recognised environment variable is described by a [`FieldSpec`]:
//! its key, how the raw string is interpreted, what happens when it is absent,
//! and the constraint applied after coercion. The validator walks these specs;
//! nothing else in the crate reads raw environment keys directly.

use std::fmt;
use types::{EnvironmentKind, LogLevel};

/// Prefix marking a variable as safe to expose outside the server
pub const PUBLIC_PREFIX: &str = "NEXT_PUBLIC_";

/// How a raw string value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form string
    Text,
    /// String that must parse as an absolute URL
    Url,
    /// Base-10 integer
    Integer,
    /// `"true"` is true, any other value is false
    Boolean,
    /// One of a fixed set of strings
    Enum(&'static [&'static str]),
}

/// What happens when the variable is not set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Substitute this raw value, then interpret it like any other
    Default(&'static str),
    /// Absence is a validation error
    Required,
    /// Absence leaves the field empty
    Optional,
}

/// Constraint checked after coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    None,
    /// Integer strictly greater than zero
    Positive,
    /// Integer greater than or equal to zero
    NonNegative,
    /// String with at least this many characters
    MinLength(usize),
}

/// Declarative description of one environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub constraint: Constraint,
}

impl FieldSpec {
    const fn new(
        key: &'static str,
        kind: FieldKind,
        presence: Presence,
        constraint: Constraint,
    ) -> Self {
        Self {
            key,
            kind,
            presence,
            constraint,
        }
    }

    /// Whether the key carries the public-exposure prefix
    pub fn is_public(&self) -> bool {
        self.key.starts_with(PUBLIC_PREFIX)
    }
}

// App configuration
pub const NODE_ENV: FieldSpec = FieldSpec::new(
    "NODE_ENV",
    FieldKind::Enum(EnvironmentKind::VARIANTS),
    Presence::Default("development"),
    Constraint::None,
);
pub const APP_NAME: FieldSpec = FieldSpec::new(
    "NEXT_PUBLIC_APP_NAME",
    FieldKind::Text,
    Presence::Default("Template App"),
    Constraint::None,
);
pub const APP_VERSION: FieldSpec = FieldSpec::new(
    "NEXT_PUBLIC_APP_VERSION",
    FieldKind::Text,
    Presence::Default("1.0.0"),
    Constraint::None,
);
pub const APP_URL: FieldSpec = FieldSpec::new(
    "NEXT_PUBLIC_APP_URL",
    FieldKind::Url,
    Presence::Required,
    Constraint::None,
);

// API configuration
pub const API_URL: FieldSpec = FieldSpec::new(
    "NEXT_PUBLIC_API_URL",
    FieldKind::Url,
    Presence::Required,
    Constraint::None,
);
pub const API_TIMEOUT: FieldSpec = FieldSpec::new(
    "API_TIMEOUT",
    FieldKind::Integer,
    Presence::Default("30000"),
    Constraint::Positive,
);

// Database configuration
pub const DATABASE_URL: FieldSpec = FieldSpec::new(
    "DATABASE_URL",
    FieldKind::Url,
    Presence::Optional,
    Constraint::None,
);
pub const DATABASE_SSL: FieldSpec = FieldSpec::new(
    "DATABASE_SSL",
    FieldKind::Boolean,
    Presence::Default("false"),
    Constraint::None,
);
pub const DATABASE_POOL_MIN: FieldSpec = FieldSpec::new(
    "DATABASE_POOL_MIN",
    FieldKind::Integer,
    Presence::Default("2"),
    Constraint::NonNegative,
);
pub const DATABASE_POOL_MAX: FieldSpec = FieldSpec::new(
    "DATABASE_POOL_MAX",
    FieldKind::Integer,
    Presence::Default("10"),
    Constraint::Positive,
);

// Redis configuration
pub const REDIS_URL: FieldSpec = FieldSpec::new(
    "REDIS_URL",
    FieldKind::Url,
    Presence::Optional,
    Constraint::None,
);
pub const REDIS_MAX_RETRIES: FieldSpec = FieldSpec::new(
    "REDIS_MAX_RETRIES",
    FieldKind::Integer,
    Presence::Default("3"),
    Constraint::NonNegative,
);
pub const REDIS_RETRY_DELAY: FieldSpec = FieldSpec::new(
    "REDIS_RETRY_DELAY",
    FieldKind::Integer,
    Presence::Default("1000"),
    Constraint::Positive,
);

// Authentication
pub const JWT_SECRET: FieldSpec = FieldSpec::new(
    "JWT_SECRET",
    FieldKind::Text,
    Presence::Optional,
    Constraint::MinLength(32),
);
pub const JWT_EXPIRES_IN: FieldSpec = FieldSpec::new(
    "JWT_EXPIRES_IN",
    FieldKind::Text,
    Presence::Default("7d"),
    Constraint::None,
);

// Analytics
pub const GA_TRACKING_ID: FieldSpec = FieldSpec::new(
    "NEXT_PUBLIC_GA_TRACKING_ID",
    FieldKind::Text,
    Presence::Optional,
    Constraint::None,
);
pub const ANALYTICS_ENABLED: FieldSpec = FieldSpec::new(
    "NEXT_PUBLIC_ANALYTICS_ENABLED",
    FieldKind::Boolean,
    Presence::Default("false"),
    Constraint::None,
);

// Feature flags
pub const FEATURE_FLAG_NEW_UI: FieldSpec = FieldSpec::new(
    "FEATURE_FLAG_NEW_UI",
    FieldKind::Boolean,
    Presence::Default("false"),
    Constraint::None,
);
pub const FEATURE_FLAG_BETA_FEATURES: FieldSpec = FieldSpec::new(
    "FEATURE_FLAG_BETA_FEATURES",
    FieldKind::Boolean,
    Presence::Default("false"),
    Constraint::None,
);

// Security
pub const CORS_ORIGIN: FieldSpec = FieldSpec::new(
    "CORS_ORIGIN",
    FieldKind::Text,
    Presence::Default("*"),
    Constraint::None,
);
pub const RATE_LIMIT_MAX: FieldSpec = FieldSpec::new(
    "RATE_LIMIT_MAX",
    FieldKind::Integer,
    Presence::Default("100"),
    Constraint::Positive,
);
pub const RATE_LIMIT_WINDOW: FieldSpec = FieldSpec::new(
    "RATE_LIMIT_WINDOW",
    FieldKind::Integer,
    Presence::Default("900000"), // 15 minutes
    Constraint::Positive,
);

// Monitoring
pub const LOG_LEVEL: FieldSpec = FieldSpec::new(
    "LOG_LEVEL",
    FieldKind::Enum(LogLevel::VARIANTS),
    Presence::Default("info"),
    Constraint::None,
);
pub const ENABLE_METRICS: FieldSpec = FieldSpec::new(
    "ENABLE_METRICS",
    FieldKind::Boolean,
    Presence::Default("false"),
    Constraint::None,
);

/// Every field, in the order `ValidatedEnvironment::validate` reads them and
/// reports violations
pub const FIELDS: [FieldSpec; 24] = [
    NODE_ENV,
    APP_NAME,
    APP_VERSION,
    APP_URL,
    API_URL,
    API_TIMEOUT,
    DATABASE_URL,
    DATABASE_SSL,
    DATABASE_POOL_MIN,
    DATABASE_POOL_MAX,
    REDIS_URL,
    REDIS_MAX_RETRIES,
    REDIS_RETRY_DELAY,
    JWT_SECRET,
    JWT_EXPIRES_IN,
    GA_TRACKING_ID,
    ANALYTICS_ENABLED,
    FEATURE_FLAG_NEW_UI,
    FEATURE_FLAG_BETA_FEATURES,
    CORS_ORIGIN,
    RATE_LIMIT_MAX,
    RATE_LIMIT_WINDOW,
    LOG_LEVEL,
    ENABLE_METRICS,
];

/// Strongly typed environment produced by validation.
///
/// Constructed only through [`ValidatedEnvironment::validate`]; once built it
/// is shared read-only for the lifetime of the process. `Debug` output
/// redacts connection strings and the signing secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatedEnvironment {
    pub node_env: EnvironmentKind,
    pub app_name: String,
    pub app_version: String,
    pub app_url: String,
    pub api_url: String,
    pub api_timeout: u64,
    pub database_url: Option<String>,
    pub database_ssl: bool,
    pub database_pool_min: u64,
    pub database_pool_max: u64,
    pub redis_url: Option<String>,
    pub redis_max_retries: u64,
    pub redis_retry_delay: u64,
    pub jwt_secret: Option<String>,
    pub jwt_expires_in: String,
    pub ga_tracking_id: Option<String>,
    pub analytics_enabled: bool,
    pub feature_flag_new_ui: bool,
    pub feature_flag_beta_features: bool,
    pub cors_origin: String,
    pub rate_limit_max: u64,
    pub rate_limit_window: u64,
    pub log_level: LogLevel,
    pub enable_metrics: bool,
}

impl fmt::Debug for ValidatedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("ValidatedEnvironment")
            .field("node_env", &self.node_env)
            .field("app_name", &self.app_name)
            .field("app_version", &self.app_version)
            .field("app_url", &self.app_url)
            .field("api_url", &self.api_url)
            .field("api_timeout", &self.api_timeout)
            .field("database_url", &redact(&self.database_url))
            .field("database_ssl", &self.database_ssl)
            .field("database_pool_min", &self.database_pool_min)
            .field("database_pool_max", &self.database_pool_max)
            .field("redis_url", &redact(&self.redis_url))
            .field("redis_max_retries", &self.redis_max_retries)
            .field("redis_retry_delay", &self.redis_retry_delay)
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("jwt_expires_in", &self.jwt_expires_in)
            .field("ga_tracking_id", &self.ga_tracking_id)
            .field("analytics_enabled", &self.analytics_enabled)
            .field("feature_flag_new_ui", &self.feature_flag_new_ui)
            .field("feature_flag_beta_features", &self.feature_flag_beta_features)
            .field("cors_origin", &self.cors_origin)
            .field("rate_limit_max", &self.rate_limit_max)
            .field("rate_limit_window", &self.rate_limit_window)
            .field("log_level", &self.log_level)
            .field("enable_metrics", &self.enable_metrics)
            .finish()
    }
}
