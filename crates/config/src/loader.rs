//! Environment loader implementation

use crate::environment::Environment;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Snapshot of process environment variables, taken once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnvironment {
    vars: BTreeMap<String, String>,
}

impl RawEnvironment {
    /// Capture the current process environment, skipping non UTF-8 entries
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for RawEnvironment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Loads the raw environment and runs the one-time initialization
pub struct EnvLoader;

impl EnvLoader {
    /// Load `.env` (if present) into the process, then initialize from the
    /// full process environment
    pub fn load() -> Result<Environment> {
        match dotenv::dotenv() {
            Ok(path) => debug!("Loaded environment file {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => return Err(e).context("Failed to read .env file"),
        }

        let raw = RawEnvironment::from_process();
        let environment = Environment::initialize(&raw)?;
        info!(
            environment = %environment.kind(),
            variables = raw.len(),
            "Environment initialized"
        );
        Ok(environment)
    }

    /// Initialize from an env file only, ignoring the process environment
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Environment> {
        let path = path.as_ref();
        let raw = Self::read_file(path)?;
        let environment = Environment::initialize(&raw)
            .with_context(|| format!("Invalid environment in {}", path.display()))?;
        Ok(environment)
    }

    /// Parse an env file into a raw environment without validating it
    pub fn read_file(path: &Path) -> Result<RawEnvironment> {
        let iter = dotenv::from_path_iter(path)
            .with_context(|| format!("Environment file not found: {}", path.display()))?;

        let mut raw = RawEnvironment::default();
        for item in iter {
            let (key, value) =
                item.with_context(|| format!("Failed to parse {}", path.display()))?;
            raw.insert(key, value);
        }
        Ok(raw)
    }
}
