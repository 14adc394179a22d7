//! Configuration management for robot clients
//!
//! This module provides utilities for loading and validating the connection
//! settings of the robot control server, with support for environment variables.

use std::env;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use crate::error::{Result, ServiceError};
use crate::util::parse_duration;
use once_cell::sync::Lazy;

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get an integer configuration value
    fn get_int(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value.trim().parse::<i64>()
            .map_err(|e| ServiceError::configuration(format!("Invalid integer for key {}: {}", key, e)))
    }

    /// Get a boolean configuration value
    fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get_string(key)?;
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => Err(ServiceError::configuration(format!("Invalid boolean value for key {}: {}", key, value))),
        }
    }

    /// Get a duration configuration value ("500ms", "5s", "2m" or bare seconds)
    fn get_duration(&self, key: &str) -> Result<Duration> {
        let value = self.get_string(key)?;
        parse_duration(&value)
            .ok_or_else(|| ServiceError::configuration(format!("Invalid duration for key {}: {}", key, value)))
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get an integer configuration value with a default
    fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    /// Get a boolean configuration value with a default
    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    /// Get an optional value: a missing key is `None`, a malformed one is an error
    fn get_optional<T, F>(&self, key: &str, read: F) -> Result<Option<T>>
    where
        F: Fn(&Self, &str) -> Result<T>,
        Self: Sized,
    {
        if self.get_string(key).is_err() {
            return Ok(None);
        }
        read(self, key).map(Some)
    }
}

impl<T: ConfigProvider> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,

    /// Optional namespace for variables (e.g., "SERVER")
    namespace: Option<String>,
}

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set a namespace for environment variables
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Format a configuration key as an environment variable
    pub(crate) fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        if let Some(ref namespace) = self.namespace {
            env_key.push_str(namespace);
            env_key.push('_');
        }

        // Uppercase and replace non-alphanumeric with underscores
        env_key.push_str(&key.to_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_"));

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key)
            .map_err(|e| {
                match e {
                    env::VarError::NotPresent => {
                        ServiceError::configuration(format!("Environment variable not set: {}", env_key))
                    }
                    env::VarError::NotUnicode(_) => {
                        ServiceError::configuration(format!("Environment variable is not valid unicode: {}", env_key))
                    }
                }
            })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    /// Configuration values
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// A composite config provider that tries multiple providers in order
#[derive(Default)]
pub struct CompositeConfigProvider {
    /// Ordered list of config providers to try
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl CompositeConfigProvider {
    /// Create a new composite config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider to the end of the chain
    pub fn add_provider(&mut self, provider: impl ConfigProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    /// Add a provider and return self (builder pattern)
    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.add_provider(provider);
        self
    }
}

impl ConfigProvider for CompositeConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.providers
            .iter()
            .find_map(|provider| provider.get_string(key).ok())
            .ok_or_else(|| ServiceError::configuration(format!("Configuration key not found in any provider: {}", key)))
    }
}

/// Global default configuration provider
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> = Lazy::new(|| {
    Arc::new(EnvConfigProvider::new().with_prefix("ROBOT"))
});

/// Trait for service-specific configuration
pub trait ServiceConfig: Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;

    /// Service name
    fn service_name(&self) -> &str;
}

/// Default base URL of the robot control server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for the robot control server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL (scheme, host and port)
    pub base_url: String,

    /// Path of the instruction endpoint
    pub instructions_path: String,

    /// Path of the telemetry endpoint
    pub telemetry_path: String,

    /// Path of the mission summary endpoint
    pub summary_path: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Extra attempts for retryable failures (0 sends each request once)
    pub max_retries: u32,

    /// Delay between two instruction polls
    #[serde(with = "duration_millis")]
    pub poll_interval: Duration,

    /// Number of polls before giving up on pending instructions
    pub max_poll_attempts: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            instructions_path: "/get_instructions".to_string(),
            telemetry_path: "/telemetry".to_string(),
            summary_path: "/summary".to_string(),
            timeout_seconds: 30,
            max_retries: 0,
            poll_interval: Duration::from_secs(5),
            max_poll_attempts: 60,
        }
    }
}

impl ServerConfig {
    /// Create a configuration for the given base URL, all other values default
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a config provider
    ///
    /// Every key is optional. A key that is present but malformed is an error
    /// rather than silently falling back to the default.
    pub fn from_provider<P: ConfigProvider + ConfigProviderExt>(provider: &P) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            base_url: provider.get_string_or("server_base_url", &defaults.base_url),
            instructions_path: provider.get_string_or("server_instructions_path", &defaults.instructions_path),
            telemetry_path: provider.get_string_or("server_telemetry_path", &defaults.telemetry_path),
            summary_path: provider.get_string_or("server_summary_path", &defaults.summary_path),
            timeout_seconds: provider
                .get_optional("server_timeout_seconds", P::get_int)?
                .map(|v| non_negative("server_timeout_seconds", v))
                .transpose()?
                .unwrap_or(defaults.timeout_seconds),
            max_retries: provider
                .get_optional("server_max_retries", P::get_int)?
                .map(|v| to_u32("server_max_retries", v))
                .transpose()?
                .unwrap_or(defaults.max_retries),
            poll_interval: provider
                .get_optional("server_poll_interval", P::get_duration)?
                .unwrap_or(defaults.poll_interval),
            max_poll_attempts: provider
                .get_optional("server_max_poll_attempts", P::get_int)?
                .map(|v| to_u32("server_max_poll_attempts", v))
                .transpose()?
                .unwrap_or(defaults.max_poll_attempts),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment (`ROBOT_SERVER_*`)
    pub fn from_env() -> Result<Self> {
        Self::from_provider(&**DEFAULT_PROVIDER)
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Parsed base URL
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ServiceError::configuration(format!(
                "Unsupported URL scheme '{}' in {}",
                other, self.base_url
            ))),
        }
    }
}

fn non_negative(key: &str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| ServiceError::configuration(format!("Value for key {} must not be negative: {}", key, value)))
}

fn to_u32(key: &str, value: i64) -> Result<u32> {
    let value = non_negative(key, value)?;
    u32::try_from(value)
        .map_err(|_| ServiceError::configuration(format!("Value for key {} is too large: {}", key, value)))
}

impl ServiceConfig for ServerConfig {
    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ServiceError::configuration("Server base URL is required"));
        }

        self.parsed_base_url()?;

        for (name, path) in [
            ("instructions_path", &self.instructions_path),
            ("telemetry_path", &self.telemetry_path),
            ("summary_path", &self.summary_path),
        ] {
            if !path.starts_with('/') {
                return Err(ServiceError::configuration(format!(
                    "{} must start with '/': {}",
                    name, path
                )));
            }
        }

        if self.timeout_seconds == 0 {
            return Err(ServiceError::configuration("Timeout must be greater than zero"));
        }

        if self.poll_interval.is_zero() {
            return Err(ServiceError::configuration("Poll interval must be greater than zero"));
        }

        if self.max_poll_attempts == 0 {
            return Err(ServiceError::configuration("At least one poll attempt is required"));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "robot_server"
    }
}

mod duration_millis {
    use std::time::Duration;
    use serde::{ser::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis())
            .map_err(|_| S::Error::custom(format!("duration too large: {:?}", value)))?;
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
