//! Configuration Module
//!
//! Loads server configuration from a TOML file, then applies environment
//! variable overrides.
//!
//! Every key can be overridden by an environment variable named after its
//! dotted path, upper-cased, with `.` replaced by `_`:
//! `s3.source.bucket_name` becomes `S3_SOURCE_BUCKET_NAME`.

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Connection settings for one bucket.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct S3Config {
    pub bucket_name: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Host (or full URL) of an S3-compatible service; empty means AWS
    pub endpoint: String,
    /// `http` or `https`, used when `endpoint` carries no scheme
    pub protocol: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket_name: String::new(),
            region: "us-east-1".to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            endpoint: String::new(),
            protocol: "https".to_string(),
        }
    }
}

impl S3Config {
    /// Full endpoint URL, or None to use the default AWS endpoint.
    pub fn endpoint_url(&self) -> Option<String> {
        if self.endpoint.is_empty() {
            None
        } else if self.endpoint.contains("://") {
            Some(self.endpoint.clone())
        } else {
            Some(format!("{}://{}", self.protocol, self.endpoint))
        }
    }

    fn apply_overrides<F>(&mut self, prefix: &str, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_value(&mut self.bucket_name, &format!("{prefix}_BUCKET_NAME"), lookup)?;
        override_value(&mut self.region, &format!("{prefix}_REGION"), lookup)?;
        override_value(&mut self.access_key_id, &format!("{prefix}_ACCESS_KEY_ID"), lookup)?;
        override_value(
            &mut self.secret_access_key,
            &format!("{prefix}_SECRET_ACCESS_KEY"),
            lookup,
        )?;
        override_value(&mut self.endpoint, &format!("{prefix}_ENDPOINT"), lookup)?;
        override_value(&mut self.protocol, &format!("{prefix}_PROTOCOL"), lookup)?;
        Ok(())
    }
}

/// Bucket pair and negative cache settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Bucket being migrated away from
    pub source: S3Config,
    /// Bucket being migrated to
    pub target: S3Config,
    /// Seconds a key absent from both buckets is remembered
    pub cache_error_duration: u64,
    /// Seconds between sweeps of expired negative cache entries
    pub cleanup_interval: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            source: S3Config::default(),
            target: S3Config::default(),
            cache_error_duration: 300,
            cleanup_interval: 180,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Server configuration parameters.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub s3: StorageConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Reads the TOML file at `path` and applies process environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.apply_overrides(|var| env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.s3.source.apply_overrides("S3_SOURCE", &lookup)?;
        self.s3.target.apply_overrides("S3_TARGET", &lookup)?;
        override_value(&mut self.s3.cache_error_duration, "S3_CACHE_ERROR_DURATION", &lookup)?;
        override_value(&mut self.s3.cleanup_interval, "S3_CLEANUP_INTERVAL", &lookup)?;
        override_value(&mut self.http.port, "HTTP_PORT", &lookup)?;
        Ok(())
    }

    /// Rejects configurations the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.s3.source.bucket_name.is_empty() {
            return Err(ConfigError::Invalid(
                "s3.source.bucket_name must not be empty".to_string(),
            ));
        }
        if self.s3.target.bucket_name.is_empty() {
            return Err(ConfigError::Invalid(
                "s3.target.bucket_name must not be empty".to_string(),
            ));
        }
        if self.s3.cleanup_interval == 0 {
            return Err(ConfigError::Invalid(
                "s3.cleanup_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// TTL of negative cache entries.
    pub fn cache_error_duration(&self) -> Duration {
        Duration::from_secs(self.s3.cache_error_duration)
    }

    /// Period of the expired-entry sweep.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.s3.cleanup_interval)
    }
}

// Replaces `target` with the parsed value of `var`, if set
fn override_value<T, F>(target: &mut T, var: &str, lookup: &F) -> Result<(), ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(var) {
        *target = value.parse().map_err(|_| ConfigError::InvalidEnv {
            var: var.to_string(),
            value,
        })?;
    }
    Ok(())
}
