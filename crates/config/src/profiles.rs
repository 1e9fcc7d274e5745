//! Per-environment configuration profiles

use crate::schema::ValidatedEnvironment;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;
use types::EnvironmentKind;

/// Feature flag names
pub mod features {
    pub const DEBUG_MODE: &str = "debugMode";
    pub const HOT_RELOAD: &str = "hotReload";
    pub const DEV_TOOLS: &str = "devTools";
    pub const MOCK_DATA: &str = "mockData";
    pub const VERBOSE_LOGGING: &str = "verboseLogging";
    pub const NEW_UI: &str = "newUI";
    pub const BETA_FEATURES: &str = "betaFeatures";
}

/// Named boolean toggles with a total lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeMap<String, bool>);

impl FeatureFlags {
    /// Unknown names are reported as disabled
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, bool)> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = (&'a str, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

/// Application identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSection {
    pub name: String,
    pub version: String,
    pub environment: EnvironmentKind,
    pub url: String,
}

/// API client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSection {
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout: u64,
}

/// Analytics settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSection {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

/// Environment-specific application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfigProfile {
    pub app: AppSection,
    pub api: ApiSection,
    pub features: FeatureFlags,
    pub analytics: AnalyticsSection,
}

impl AppConfigProfile {
    /// Select the profile for an environment kind
    pub fn resolve(kind: EnvironmentKind, env: &ValidatedEnvironment) -> Self {
        match kind {
            EnvironmentKind::Development => Self::development(env),
            EnvironmentKind::Production => Self::production(env),
            EnvironmentKind::Test => Self::testing(),
        }
    }

    /// Select a profile by raw `NODE_ENV` name for callers holding an
    /// unvalidated string. Unrecognized names fall back to development.
    pub fn for_node_env(name: &str, env: &ValidatedEnvironment) -> Self {
        let kind = name.parse().unwrap_or_else(|_| {
            warn!(node_env = name, "Unrecognized environment, using development profile");
            EnvironmentKind::Development
        });
        Self::resolve(kind, env)
    }

    pub fn development(env: &ValidatedEnvironment) -> Self {
        Self {
            app: AppSection {
                name: "Template App (Dev)".to_string(),
                version: "1.0.0-dev".to_string(),
                environment: EnvironmentKind::Development,
                url: env.app_url.clone(),
            },
            api: ApiSection {
                base_url: env.api_url.clone(),
                timeout: 30_000,
            },
            features: FeatureFlags::from_iter([
                (features::DEBUG_MODE, true),
                (features::HOT_RELOAD, true),
                (features::DEV_TOOLS, true),
                (features::MOCK_DATA, true),
                (features::VERBOSE_LOGGING, true),
                (features::NEW_UI, env.feature_flag_new_ui),
                (features::BETA_FEATURES, env.feature_flag_beta_features),
            ]),
            analytics: AnalyticsSection {
                enabled: false,
                tracking_id: None,
            },
        }
    }

    pub fn production(env: &ValidatedEnvironment) -> Self {
        Self {
            app: AppSection {
                name: "Template App".to_string(),
                version: "1.0.0".to_string(),
                environment: EnvironmentKind::Production,
                url: env.app_url.clone(),
            },
            api: ApiSection {
                base_url: env.api_url.clone(),
                timeout: 10_000,
            },
            features: FeatureFlags::from_iter([
                (features::DEBUG_MODE, false),
                (features::HOT_RELOAD, false),
                (features::DEV_TOOLS, false),
                (features::MOCK_DATA, false),
                (features::VERBOSE_LOGGING, false),
                (features::NEW_UI, env.feature_flag_new_ui),
                // Never enabled in production, whatever the flag says
                (features::BETA_FEATURES, false),
            ]),
            analytics: AnalyticsSection {
                enabled: env.analytics_enabled,
                tracking_id: env.ga_tracking_id.clone(),
            },
        }
    }

    pub fn testing() -> Self {
        Self {
            app: AppSection {
                name: "Template App (Test)".to_string(),
                version: "1.0.0-test".to_string(),
                environment: EnvironmentKind::Test,
                url: "http://localhost:3000".to_string(),
            },
            api: ApiSection {
                base_url: "http://localhost:3000/api".to_string(),
                timeout: 5_000,
            },
            features: FeatureFlags::from_iter([
                (features::DEBUG_MODE, true),
                (features::HOT_RELOAD, false),
                (features::DEV_TOOLS, true),
                (features::MOCK_DATA, true),
                (features::VERBOSE_LOGGING, false),
                (features::NEW_UI, false),
                (features::BETA_FEATURES, false),
            ]),
            analytics: AnalyticsSection {
                enabled: false,
                tracking_id: None,
            },
        }
    }
}
