//! Active configuration resolver and derived accessors

use crate::profiles::AppConfigProfile;
use crate::schema::ValidatedEnvironment;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use types::EnvironmentKind;

/// Database connection options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub ssl: bool,
    pub pool: PoolConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolConfig {
    pub min: u64,
    pub max: u64,
}

/// Redis connection options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedisConfig {
    pub url: Option<String>,
    pub max_retries_per_request: u64,
    pub retry_delay_ms: u64,
}

/// Token signing options
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub jwt_expires_in: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[redacted]"))
            .field("jwt_expires_in", &self.jwt_expires_in)
            .finish()
    }
}

/// Request rate limiting options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitConfig {
    pub max: u64,
    pub window_ms: u64,
}

/// Allowed CORS origins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigin {
    /// Any origin; serialized as `true`
    AllowAll,
    /// Explicit origin list
    List(Vec<String>),
}

impl Serialize for CorsOrigin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CorsOrigin::AllowAll => serializer.serialize_bool(true),
            CorsOrigin::List(origins) => origins.serialize(serializer),
        }
    }
}

/// CORS options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorsConfig {
    pub origin: CorsOrigin,
    pub credentials: bool,
}

/// Holds the active profile and projects the validated environment into
/// per-concern option structs
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    env: Arc<ValidatedEnvironment>,
    profile: AppConfigProfile,
}

impl ConfigResolver {
    pub fn new(env: Arc<ValidatedEnvironment>) -> Self {
        let profile = AppConfigProfile::resolve(env.node_env, &env);
        debug!(
            environment = %env.node_env,
            app = %profile.app.name,
            "Configuration profile selected"
        );
        Self { env, profile }
    }

    pub fn kind(&self) -> EnvironmentKind {
        self.env.node_env
    }

    pub fn active_config(&self) -> &AppConfigProfile {
        &self.profile
    }

    /// Total lookup: unknown flag names are disabled
    pub fn is_feature_enabled(&self, name: &str) -> bool {
        self.profile.features.is_enabled(name)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.env.database_url.clone(),
            ssl: self.env.database_ssl,
            pool: PoolConfig {
                min: self.env.database_pool_min,
                max: self.env.database_pool_max,
            },
        }
    }

    pub fn redis_config(&self) -> RedisConfig {
        RedisConfig {
            url: self.env.redis_url.clone(),
            max_retries_per_request: self.env.redis_max_retries,
            retry_delay_ms: self.env.redis_retry_delay,
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.env.jwt_secret.clone(),
            jwt_expires_in: self.env.jwt_expires_in.clone(),
        }
    }

    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            max: self.env.rate_limit_max,
            window_ms: self.env.rate_limit_window,
        }
    }

    pub fn cors_config(&self) -> CorsConfig {
        let origin = if self.env.cors_origin == "*" {
            CorsOrigin::AllowAll
        } else {
            CorsOrigin::List(
                self.env
                    .cors_origin
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        };

        CorsConfig {
            origin,
            credentials: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RawEnvironment;
    use crate::profiles::features;

    fn resolver(pairs: &[(&str, &str)]) -> ConfigResolver {
        let mut raw = RawEnvironment::from_iter([
            ("NEXT_PUBLIC_APP_URL", "https://x.com"),
            ("NEXT_PUBLIC_API_URL", "https://x.com/api"),
        ]);
        for (k, v) in pairs {
            raw.insert(*k, *v);
        }
        ConfigResolver::new(Arc::new(ValidatedEnvironment::validate(&raw).unwrap()))
    }

    #[test]
    fn test_selects_profile_by_kind() {
        assert_eq!(
            resolver(&[]).active_config().app.environment,
            EnvironmentKind::Development
        );
        assert_eq!(
            resolver(&[("NODE_ENV", "production")]).active_config().app.name,
            "Template App"
        );
        assert_eq!(
            resolver(&[("NODE_ENV", "test")]).active_config(),
            &AppConfigProfile::testing()
        );
    }

    #[test]
    fn test_is_feature_enabled_is_total() {
        for node_env in ["development", "production", "test"] {
            let r = resolver(&[("NODE_ENV", node_env)]);
            assert!(!r.is_feature_enabled("doesNotExist"));
            assert!(!r.is_feature_enabled(""));
        }
        assert!(resolver(&[]).is_feature_enabled(features::DEBUG_MODE));
    }

    #[test]
    fn test_cors_allow_all() {
        let cors = resolver(&[]).cors_config();
        assert_eq!(cors.origin, CorsOrigin::AllowAll);
        assert!(cors.credentials);
        assert_eq!(
            serde_json::to_value(&cors).unwrap(),
            serde_json::json!({ "origin": true, "credentials": true })
        );
    }

    #[test]
    fn test_cors_origin_list() {
        let cors = resolver(&[("CORS_ORIGIN", "a.com,b.com")]).cors_config();
        assert_eq!(
            cors.origin,
            CorsOrigin::List(vec!["a.com".to_string(), "b.com".to_string()])
        );
        assert_eq!(
            serde_json::to_value(&cors.origin).unwrap(),
            serde_json::json!(["a.com", "b.com"])
        );
        assert!(cors.credentials);

        let padded = resolver(&[("CORS_ORIGIN", " a.com , b.com,,")]).cors_config();
        assert_eq!(padded.origin, cors.origin);
    }

    #[test]
    fn test_projections() {
        let r = resolver(&[
            ("NODE_ENV", "production"),
            ("DATABASE_URL", "postgres://db/app"),
            ("DATABASE_SSL", "true"),
            ("DATABASE_POOL_MAX", "25"),
            ("REDIS_URL", "redis://cache:6379"),
            ("REDIS_MAX_RETRIES", "0"),
            ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("RATE_LIMIT_MAX", "50"),
        ]);

        let db = r.database_config();
        assert_eq!(db.url.as_deref(), Some("postgres://db/app"));
        assert!(db.ssl);
        assert_eq!(db.pool, PoolConfig { min: 2, max: 25 });

        let redis = r.redis_config();
        assert_eq!(redis.url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(redis.max_retries_per_request, 0);
        assert_eq!(redis.retry_delay_ms, 1000);

        let auth = r.auth_config();
        assert_eq!(auth.jwt_expires_in, "7d");
        assert!(!format!("{auth:?}").contains("0123456789abcdef"));

        assert_eq!(r.rate_limit_config(), RateLimitConfig { max: 50, window_ms: 900000 });
    }

    #[test]
    fn test_projections_do_not_depend_on_profile() {
        let dev = resolver(&[("RATE_LIMIT_MAX", "7")]);
        let test = resolver(&[("NODE_ENV", "test"), ("RATE_LIMIT_MAX", "7")]);
        assert_eq!(dev.rate_limit_config(), test.rate_limit_config());
        assert_eq!(dev.database_config(), test.database_config());
    }

    #[test]
    fn test_production_scenario() {
        let raw = RawEnvironment::from_iter([
            ("NODE_ENV", "production"),
            ("NEXT_PUBLIC_APP_URL", "https://x.com"),
            ("NEXT_PUBLIC_API_URL", "https://x.com/api"),
        ]);
        let env = ValidatedEnvironment::validate(&raw).unwrap();
        assert_eq!(env.api_timeout, 30000);

        let r = ConfigResolver::new(Arc::new(env));
        let profile = r.active_config();
        assert_eq!(profile.app.url, "https://x.com");
        assert!(!profile.features.is_enabled(features::BETA_FEATURES));
        assert!(!profile.analytics.enabled);
    }
}
