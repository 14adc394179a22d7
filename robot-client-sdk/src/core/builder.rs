//! Client builder implementation
//!
//! Provides a unified builder pattern for creating and configuring the HTTP
//! layer shared by the service clients.

use std::collections::HashMap;
use std::time::Duration;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::Client as ReqwestClient;
use std::str::FromStr;

use crate::config::{ServerConfig, ServiceConfig};
use crate::error::{Result, ServiceError};
use crate::resilience::{RetryConfig, RetryExecutor};
use crate::services::common::{HttpExecutor, UserAgent};

/// Unified client builder for all service clients
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    /// Base URL for the service
    base_url: Option<String>,

    /// Custom headers to include with all requests
    custom_headers: HashMap<String, String>,

    /// Request timeout
    timeout: Option<Duration>,

    /// Retry configuration
    retry_config: Option<RetryConfig>,

    /// User agent
    user_agent: Option<String>,

    /// Enable response compression
    compression: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            custom_headers: HashMap::new(),
            timeout: Some(Duration::from_secs(30)), // Default 30s timeout
            retry_config: None,
            user_agent: Some(UserAgent::default().to_string()),
            compression: true,
        }
    }
}

impl ClientBuilder {
    /// Create a new client builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder preloaded from a server configuration
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new()
            .base_url(config.base_url.clone())
            .timeout(config.timeout())
            .retry_config(RetryConfig::with_max_retries(config.max_retries))
    }

    /// Set the base URL for the service
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Add a custom header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(key.into(), value.into());
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the request timeout, leaving only the transport defaults
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Configure retry behavior
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Enable or disable compression
    pub fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Build an HTTP client with the configured settings
    ///
    /// Every request carries `Accept: application/json` unless a custom
    /// header overrides it.
    pub fn build_http_client(&self) -> Result<ReqwestClient> {
        let mut builder = ReqwestClient::builder();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(ref user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder = builder.gzip(self.compression);

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        for (key, value) in &self.custom_headers {
            let header_name = HeaderName::from_str(key)
                .map_err(|e| ServiceError::configuration(format!("Invalid header name: {}", e)))?;

            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ServiceError::configuration(format!("Invalid header value: {}", e)))?;

            headers.insert(header_name, header_value);
        }

        builder = builder.default_headers(headers);

        builder.build()
            .map_err(|e| ServiceError::configuration(format!("Failed to build HTTP client: {}", e)))
    }

    /// Build the retry executor with the configured settings
    pub fn build_retry(&self) -> RetryExecutor {
        RetryExecutor::new(self.retry_config.clone().unwrap_or_default())
    }

    /// Build a request executor bound to the configured base URL
    pub fn build_executor(&self, service: &'static str) -> Result<HttpExecutor> {
        let base_url = self.base_url.clone().ok_or_else(|| ServiceError::configuration("Base URL is required"))?;

        // Reuse the server config validation for the URL itself
        ServerConfig::new(base_url.clone()).validate()?;

        Ok(HttpExecutor::new(service, base_url, self.build_http_client()?, self.build_retry()))
    }
}
