//! HTTP server bind settings

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use types::{ConfigurationError, FieldError};

/// HTTP server configuration, read from `SERVER_*` variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `SERVER_HOST`, `SERVER_PORT` and
    /// `SERVER_REQUEST_TIMEOUT_SECONDS`
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Env::prefixed("SERVER_"))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: ServerConfig = figment
            .extract()
            .context("Failed to parse server configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        let mut errors = Vec::new();
        if self.host.is_empty() {
            errors.push(FieldError::new("SERVER_HOST", "Server host cannot be empty"));
        }
        if self.port == 0 {
            errors.push(FieldError::new("SERVER_PORT", "Server port cannot be 0"));
        }
        if self.request_timeout_seconds == 0 {
            errors.push(FieldError::new(
                "SERVER_REQUEST_TIMEOUT_SECONDS",
                "Request timeout cannot be 0",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::new(errors))
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("Invalid server host/port configuration")
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}
