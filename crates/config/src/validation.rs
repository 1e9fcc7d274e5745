//! Environment validation
//!
//! [`FieldReader`] interprets the [`FieldSpec`] table against a raw
//! environment in a single pass. Every field is read even after a failure so
//! the resulting [`ConfigurationError`] names all offending variables.

use crate::loader::RawEnvironment;
use crate::schema::{self, Constraint, FieldKind, FieldSpec, Presence, ValidatedEnvironment};
use std::str::FromStr;
use tracing::debug;
use types::environment::ParseVariantError;
use types::{ConfigurationError, FieldError};
use url::Url;

/// A raw value after coercion
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

/// Single-pass reader that records violations instead of stopping at them
pub struct FieldReader<'a> {
    raw: &'a RawEnvironment,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub fn new(raw: &'a RawEnvironment) -> Self {
        Self {
            raw,
            errors: Vec::new(),
        }
    }

    /// Apply presence rules, coercion and constraint for one field
    fn read(&mut self, field: &FieldSpec) -> Option<FieldValue> {
        let value = match (self.raw.get(field.key), field.presence) {
            (Some(value), _) => value,
            (None, Presence::Default(default)) => default,
            (None, Presence::Optional) => return None,
            (None, Presence::Required) => {
                self.reject(field, "is required".to_string());
                return None;
            }
        };

        match interpret(field, value) {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                self.reject(field, reason);
                None
            }
        }
    }

    fn reject(&mut self, field: &FieldSpec, reason: String) {
        debug!(field = field.key, reason = %reason, "Environment field rejected");
        self.errors.push(FieldError::new(field.key, reason));
    }

    pub fn text(&mut self, field: &FieldSpec) -> String {
        self.optional_text(field).unwrap_or_default()
    }

    pub fn optional_text(&mut self, field: &FieldSpec) -> Option<String> {
        match self.read(field) {
            Some(FieldValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn integer(&mut self, field: &FieldSpec) -> u64 {
        match self.read(field) {
            // Bounds were enforced by the constraint, so the value is non-negative
            Some(FieldValue::Integer(value)) => u64::try_from(value).unwrap_or_default(),
            _ => 0,
        }
    }

    pub fn boolean(&mut self, field: &FieldSpec) -> bool {
        matches!(self.read(field), Some(FieldValue::Boolean(true)))
    }

    /// Read an enum field into its typed form
    pub fn variant<T>(&mut self, field: &FieldSpec) -> T
    where
        T: FromStr<Err = ParseVariantError> + Default,
    {
        self.optional_text(field)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Violations recorded so far
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Succeed only if no field was rejected
    pub fn finish(self) -> Result<(), ConfigurationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::new(self.errors))
        }
    }
}

fn interpret(field: &FieldSpec, value: &str) -> Result<FieldValue, String> {
    let parsed = match field.kind {
        FieldKind::Text => FieldValue::Text(value.to_string()),
        FieldKind::Url => {
            Url::parse(value).map_err(|_| "must be a valid URL".to_string())?;
            FieldValue::Text(value.to_string())
        }
        FieldKind::Integer => {
            let number = value
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("expected an integer, received \"{}\"", value))?;
            FieldValue::Integer(number)
        }
        FieldKind::Boolean => FieldValue::Boolean(value == "true"),
        FieldKind::Enum(variants) => {
            if !variants.contains(&value) {
                return Err(ParseVariantError::new(value, variants).to_string());
            }
            FieldValue::Text(value.to_string())
        }
    };

    check_constraint(field.constraint, &parsed)?;
    Ok(parsed)
}

fn check_constraint(constraint: Constraint, value: &FieldValue) -> Result<(), String> {
    match (constraint, value) {
        (Constraint::Positive, FieldValue::Integer(n)) if *n <= 0 => {
            Err("must be greater than 0".to_string())
        }
        (Constraint::NonNegative, FieldValue::Integer(n)) if *n < 0 => {
            Err("must be greater than or equal to 0".to_string())
        }
        (Constraint::MinLength(min), FieldValue::Text(s)) if s.chars().count() < min => {
            Err(format!("must contain at least {} characters", min))
        }
        _ => Ok(()),
    }
}

impl ValidatedEnvironment {
    /// Validate a raw environment against the schema.
    ///
    /// Either every field is populated or the returned error lists every
    /// violation; partial results are never exposed.
    pub fn validate(raw: &RawEnvironment) -> Result<Self, ConfigurationError> {
        let mut reader = FieldReader::new(raw);

        let env = ValidatedEnvironment {
            node_env: reader.variant(&schema::NODE_ENV),
            app_name: reader.text(&schema::APP_NAME),
            app_version: reader.text(&schema::APP_VERSION),
            app_url: reader.text(&schema::APP_URL),
            api_url: reader.text(&schema::API_URL),
            api_timeout: reader.integer(&schema::API_TIMEOUT),
            database_url: reader.optional_text(&schema::DATABASE_URL),
            database_ssl: reader.boolean(&schema::DATABASE_SSL),
            database_pool_min: reader.integer(&schema::DATABASE_POOL_MIN),
            database_pool_max: reader.integer(&schema::DATABASE_POOL_MAX),
            redis_url: reader.optional_text(&schema::REDIS_URL),
            redis_max_retries: reader.integer(&schema::REDIS_MAX_RETRIES),
            redis_retry_delay: reader.integer(&schema::REDIS_RETRY_DELAY),
            jwt_secret: reader.optional_text(&schema::JWT_SECRET),
            jwt_expires_in: reader.text(&schema::JWT_EXPIRES_IN),
            ga_tracking_id: reader.optional_text(&schema::GA_TRACKING_ID),
            analytics_enabled: reader.boolean(&schema::ANALYTICS_ENABLED),
            feature_flag_new_ui: reader.boolean(&schema::FEATURE_FLAG_NEW_UI),
            feature_flag_beta_features: reader.boolean(&schema::FEATURE_FLAG_BETA_FEATURES),
            cors_origin: reader.text(&schema::CORS_ORIGIN),
            rate_limit_max: reader.integer(&schema::RATE_LIMIT_MAX),
            rate_limit_window: reader.integer(&schema::RATE_LIMIT_WINDOW),
            log_level: reader.variant(&schema::LOG_LEVEL),
            enable_metrics: reader.boolean(&schema::ENABLE_METRICS),
        };

        reader.finish()?;
        Ok(env)
    }
}
