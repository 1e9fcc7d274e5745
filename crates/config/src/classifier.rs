//! Environment classification
//!
//! Splits the validated environment into a server-only view and a
//! client-safe view. The client-safe view is assembled from an explicit
//! allow-list, so a newly added field stays private until it is listed here.

use crate::schema::{self, ValidatedEnvironment};
use std::collections::BTreeMap;
use std::fmt;
use types::EnvironmentKind;

/// Keys that may be exposed outside the trust boundary
pub const CLIENT_SAFE_KEYS: [&str; 6] = [
    schema::APP_NAME.key,
    schema::APP_VERSION.key,
    schema::APP_URL.key,
    schema::API_URL.key,
    schema::GA_TRACKING_ID.key,
    schema::ANALYTICS_ENABLED.key,
];

/// Keys that must never leave the server
pub const SERVER_ONLY_KEYS: [&str; 3] = [
    schema::DATABASE_URL.key,
    schema::JWT_SECRET.key,
    schema::REDIS_URL.key,
];

/// Derived environment kind plus the public/private field partition
#[derive(Debug, Clone)]
pub struct Classification {
    pub kind: EnvironmentKind,
    pub server: ServerEnv,
    pub client: ClientEnv,
}

impl Classification {
    pub fn classify(env: &ValidatedEnvironment) -> Self {
        Self {
            kind: env.node_env,
            server: ServerEnv {
                database_url: env.database_url.clone(),
                jwt_secret: env.jwt_secret.clone(),
                redis_url: env.redis_url.clone(),
            },
            client: ClientEnv {
                app_name: env.app_name.clone(),
                app_version: env.app_version.clone(),
                app_url: env.app_url.clone(),
                api_url: env.api_url.clone(),
                ga_tracking_id: env.ga_tracking_id.clone(),
                analytics_enabled: env.analytics_enabled,
            },
        }
    }

    pub fn is_development(&self) -> bool {
        self.kind.is_development()
    }

    pub fn is_production(&self) -> bool {
        self.kind.is_production()
    }

    pub fn is_test(&self) -> bool {
        self.kind.is_test()
    }
}

/// Server-only secrets and connection strings
#[derive(Clone, PartialEq, Eq)]
pub struct ServerEnv {
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub redis_url: Option<String>,
}

impl fmt::Debug for ServerEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("ServerEnv")
            .field("database_url", &redact(&self.database_url))
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("redis_url", &redact(&self.redis_url))
            .finish()
    }
}

/// Values safe to hand to a browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEnv {
    pub app_name: String,
    pub app_version: String,
    pub app_url: String,
    pub api_url: String,
    pub ga_tracking_id: Option<String>,
    pub analytics_enabled: bool,
}

impl ClientEnv {
    /// Render as `NEXT_PUBLIC_*` variables; unset optional values are omitted
    pub fn public_variables(&self) -> BTreeMap<String, String> {
        let values = [
            Some(self.app_name.clone()),
            Some(self.app_version.clone()),
            Some(self.app_url.clone()),
            Some(self.api_url.clone()),
            self.ga_tracking_id.clone(),
            Some(self.analytics_enabled.to_string()),
        ];

        CLIENT_SAFE_KEYS
            .iter()
            .zip(values)
            .filter_map(|(key, value)| Some((key.to_string(), value?)))
            .collect()
    }
}
