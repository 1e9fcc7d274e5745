//! Configuration management for the Template App runtime
//!
//! This crate turns the raw process environment into a validated, typed
//! environment, classifies it, and resolves the active configuration profile.
//! [`Environment::initialize`] runs the whole pipeline once at startup.

pub mod classifier;
pub mod environment;
pub mod loader;
pub mod profiles;
pub mod resolver;
pub mod schema;
pub mod server;
pub mod validation;

pub use classifier::{Classification, ClientEnv, ServerEnv};
pub use environment::Environment;
pub use loader::{EnvLoader, RawEnvironment};
pub use profiles::{AppConfigProfile, FeatureFlags};
pub use resolver::{
    AuthConfig, ConfigResolver, CorsConfig, CorsOrigin, DatabaseConfig, RateLimitConfig,
    RedisConfig,
};
pub use schema::ValidatedEnvironment;
pub use server::ServerConfig;
