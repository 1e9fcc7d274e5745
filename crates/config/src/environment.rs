//! Process-wide environment context

use crate::classifier::Classification;
use crate::loader::RawEnvironment;
use crate::resolver::ConfigResolver;
use crate::schema::ValidatedEnvironment;
use std::sync::Arc;
use types::{ConfigurationError, EnvironmentKind};

/// Validated environment, its classification and the resolved profile.
///
/// Built once by the process entry point and shared read-only afterwards;
/// nothing downstream can observe configuration before this succeeds.
#[derive(Debug, Clone)]
pub struct Environment {
    validated: Arc<ValidatedEnvironment>,
    classification: Classification,
    resolver: ConfigResolver,
}

impl Environment {
    /// Validate, classify and resolve in one step
    pub fn initialize(raw: &RawEnvironment) -> Result<Self, ConfigurationError> {
        let validated = Arc::new(ValidatedEnvironment::validate(raw)?);
        let classification = Classification::classify(&validated);
        let resolver = ConfigResolver::new(Arc::clone(&validated));

        Ok(Self {
            validated,
            classification,
            resolver,
        })
    }

    pub fn kind(&self) -> EnvironmentKind {
        self.classification.kind
    }

    pub fn validated(&self) -> &ValidatedEnvironment {
        &self.validated
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::LogLevel;

    #[test]
    fn test_initialize_production() {
        let raw = RawEnvironment::from_iter([
            ("NODE_ENV", "production"),
            ("NEXT_PUBLIC_APP_URL", "https://x.com"),
            ("NEXT_PUBLIC_API_URL", "https://x.com/api"),
            ("LOG_LEVEL", "error"),
        ]);

        let environment = Environment::initialize(&raw).unwrap();
        assert_eq!(environment.kind(), EnvironmentKind::Production);
        assert!(environment.classification().is_production());
        assert_eq!(environment.validated().log_level, LogLevel::Error);
        assert_eq!(environment.resolver().kind(), EnvironmentKind::Production);
        assert_eq!(environment.resolver().active_config().api.timeout, 10_000);
    }

    #[test]
    fn test_initialize_fails_without_partial_result() {
        let raw = RawEnvironment::from_iter([("NODE_ENV", "staging")]);
        let err = Environment::initialize(&raw).unwrap_err();
        assert_eq!(err.errors.len(), 3);
    }
}
