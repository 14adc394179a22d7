//! Common utilities for service clients
//!
//! This module provides the HTTP executor shared by all service clients:
//! URL building, status logging, status-to-error mapping and JSON decoding.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{header, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::core::RequestExecutor;
use crate::error::{ErrorContext, Result, ServiceError};
use crate::resilience::RetryExecutor;
use crate::util::{measure_time_async, truncate_string};

/// Longest body excerpt attached to a parsing error
const MAX_BODY_EXCERPT: usize = 200;

/// UserAgent structure for identifying the client to the control server
#[derive(Debug, Clone)]
pub struct UserAgent {
    /// Application name
    pub app_name: String,

    /// Version string
    pub version: String,

    /// Optional extra info
    pub extra: Option<String>,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self {
            app_name: "robot-client-sdk".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            extra: None,
        }
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app_name, self.version)?;

        if let Some(ref extra) = self.extra {
            write!(f, " ({})", extra)?;
        }

        Ok(())
    }
}

/// Create error context for HTTP requests
pub fn create_error_context(
    service_name: &str,
    endpoint: &str,
    status: Option<StatusCode>,
) -> ErrorContext {
    let mut context = ErrorContext::for_service(service_name).endpoint(endpoint);

    if let Some(status_code) = status {
        context = context.status_code(status_code.as_u16());
    }

    context
}

/// Turn a non-success response into a ServiceError
pub async fn parse_error_response(
    service_name: &str,
    endpoint: &str,
    response: Response,
) -> ServiceError {
    let status = response.status();
    let mut context = create_error_context(service_name, endpoint, Some(status));

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => format!("Failed to read error response: {}", e),
    };

    crate::error::mapping::map_http_error(status, &body, &mut context)
        .with_context(context)
}

/// HTTP request executor bound to one service base URL
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    /// Service name used in logs and error context
    service: &'static str,

    /// Base URL, without trailing slash
    base_url: String,

    /// HTTP client
    http_client: Client,

    /// Retry policy
    retry: RetryExecutor,
}

impl HttpExecutor {
    /// Create a new executor
    pub fn new(
        service: &'static str,
        base_url: impl Into<String>,
        http_client: Client,
        retry: RetryExecutor,
    ) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self {
            service,
            base_url,
            http_client,
            retry,
        }
    }

    /// Service name
    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of `endpoint` below the base URL
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let endpoint = endpoint.trim_start_matches('/');
        let url = Url::parse(&format!("{}/{}", self.base_url, endpoint))?;
        Ok(url)
    }

    /// Send a bare GET and report the status, without decoding anything
    pub async fn probe(&self, endpoint: &str) -> Result<StatusCode> {
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::from(e).with_context(create_error_context(self.service, endpoint, None)))?;
        Ok(response.status())
    }

    async fn get_once<R>(
        &self,
        url: &Url,
        endpoint: &str,
        query_params: &Option<HashMap<String, String>>,
    ) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let mut builder = self.http_client.get(url.clone());

        if let Some(params) = query_params {
            builder = builder.query(params);
        }

        debug!("Sending request to {}: GET {} {:?}", self.service, url, query_params);

        let (response, elapsed) = measure_time_async(|| builder.send()).await;
        let response = response
            .map_err(|e| ServiceError::from(e).with_context(create_error_context(self.service, endpoint, None)))?;

        let status = response.status();
        info!(
            "{} GET {} -> {} {} in {:?}",
            self.service,
            endpoint,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            elapsed
        );

        if status != StatusCode::OK {
            return Err(parse_error_response(self.service, endpoint, response).await);
        }

        self.decode_body(endpoint, response).await
    }

    async fn post_once<R>(&self, url: &Url, endpoint: &str, body: &[u8]) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        debug!("Sending request to {}: POST {} ({} bytes)", self.service, url, body.len());

        let request = self
            .http_client
            .post(url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.to_vec());

        let (response, elapsed) = measure_time_async(|| request.send()).await;
        let response = response
            .map_err(|e| ServiceError::from(e).with_context(create_error_context(self.service, endpoint, None)))?;

        let status = response.status();
        info!(
            "{} POST {} -> {} {} in {:?}",
            self.service,
            endpoint,
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            elapsed
        );

        if !status.is_success() {
            return Err(parse_error_response(self.service, endpoint, response).await);
        }

        self.decode_body(endpoint, response).await
    }

    /// Read the whole body as UTF-8 and decode it as JSON
    async fn decode_body<R>(&self, endpoint: &str, response: Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let context = || create_error_context(self.service, endpoint, Some(status));

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::from(e).with_context(context()))?;

        let text = std::str::from_utf8(&bytes).map_err(|e| {
            ServiceError::parsing(format!("Response body is not valid UTF-8: {}", e)).with_context(context())
        })?;

        serde_json::from_str::<R>(text).map_err(|e| {
            ServiceError::parsing(format!("Failed to parse response: {}", e))
                .with_context(context().with("body", truncate_string(text, MAX_BODY_EXCERPT)))
        })
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn get<R>(&self, endpoint: &str, query_params: Option<HashMap<String, String>>) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let url = self.endpoint_url(endpoint)?;
        let url = &url;
        let query_params = &query_params;

        self.retry
            .execute(|| async move { self.get_once(url, endpoint, query_params).await })
            .await
    }

    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        let url = self.endpoint_url(endpoint)?;
        let url = &url;

        let payload = serde_json::to_vec(body)
            .map_err(|e| ServiceError::validation(format!("Failed to serialize request: {}", e)))?;
        let payload = payload.as_slice();

        self.retry
            .execute(|| async move { self.post_once(url, endpoint, payload).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor(base_url: &str) -> HttpExecutor {
        HttpExecutor::new("test", base_url, Client::new(), RetryExecutor::default())
    }

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        let exec = executor("http://10.7.5.118:8000/");
        assert_eq!(
            exec.endpoint_url("/get_instructions").unwrap().as_str(),
            "http://10.7.5.118:8000/get_instructions"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let exec = executor("http://robots.local/api");
        assert_eq!(
            exec.endpoint_url("telemetry").unwrap().as_str(),
            "http://robots.local/api/telemetry"
        );
    }

    #[test]
    fn test_user_agent_format() {
        let ua = UserAgent {
            app_name: "robot".to_string(),
            version: "1.2.3".to_string(),
            extra: Some("sim".to_string()),
        };
        assert_eq!(ua.to_string(), "robot/1.2.3 (sim)");
    }
}
