//! Instruction client implementation
//!
//! A robot asks the control server for its pending instruction blocks with
//! `GET /get_instructions?robot_id=<uuid>`. The server answers
//! `{"blocks": [2, 6, 7]}`.
//!
//! Two flavours of the fetch are offered:
//! - [`InstructionClient::fetch_instructions`] reports every failure as a
//!   [`ServiceError`], so callers can tell a server error from an
//!   unreachable host or a malformed body.
//! - [`InstructionClient::fetch_instructions_or_empty`] logs the failure and
//!   returns an empty list, for callers that only care whether there is
//!   work to do.

mod models;
pub use models::*;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};
use uuid::Uuid;

use crate::config::{ServerConfig, ServiceConfig, DEFAULT_PROVIDER};
use crate::core::{ClientBuilder, InstructionSource, RequestExecutor, ServiceClient};
use crate::error::{Result, ServiceError};
use crate::resilience::{self, PollConfig, RetryConfig};
use crate::services::common::HttpExecutor;

/// Service name used in logs and error context
pub const SERVICE_NAME: &str = "instructions";

/// Client for the instruction endpoint of the robot control server
#[derive(Debug, Clone)]
pub struct InstructionClient {
    /// HTTP executor
    executor: HttpExecutor,

    /// Configuration
    config: ServerConfig,
}

impl InstructionClient {
    /// Create a client from the `ROBOT_SERVER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new_with_config(ServerConfig::from_env()?)
    }

    /// Create a client for the given base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::new_with_config(ServerConfig::new(base_url))
    }

    /// Create a new client with custom configuration
    pub fn new_with_config(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let executor = ClientBuilder::from_config(&config).build_executor(SERVICE_NAME)?;
        Ok(Self { executor, config })
    }

    /// Create a new builder for the instruction client
    pub fn builder() -> InstructionClientBuilder {
        InstructionClientBuilder::default()
    }

    /// Current configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Polling policy derived from the configuration
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::from(&self.config)
    }

    /// Fetch the pending instruction blocks for `robot_id`
    ///
    /// An empty list is a valid answer: the robot has nothing to do.
    pub async fn fetch_instructions(&self, robot_id: Uuid) -> Result<Vec<i64>> {
        let mut params = HashMap::new();
        params.insert("robot_id".to_string(), robot_id.hyphenated().to_string());

        let envelope: InstructionEnvelope = self
            .executor
            .get(&self.config.instructions_path, Some(params))
            .await
            .map_err(|e| e.with_context_value("robot_id", robot_id))?;

        debug!("Instruction blocks for robot {}: {:?}", robot_id, envelope.blocks);

        Ok(envelope.into_blocks())
    }

    /// Fetch the pending instruction blocks, collapsing every failure to an
    /// empty list after logging it
    pub async fn fetch_instructions_or_empty(&self, robot_id: Uuid) -> Vec<i64> {
        match self.fetch_instructions(robot_id).await {
            Ok(blocks) => blocks,
            Err(e) => {
                match e.status_code() {
                    Some(status) => error!(
                        "Failed to fetch instructions for robot {} ({} error, status {}): {}",
                        robot_id,
                        e.kind(),
                        status,
                        e
                    ),
                    None => error!(
                        "Failed to fetch instructions for robot {} ({} error): {}",
                        robot_id,
                        e.kind(),
                        e
                    ),
                }
                Vec::new()
            }
        }
    }

    /// Poll until the server hands out a non-empty instruction list
    pub async fn wait_for_instructions(&self, robot_id: Uuid, poll: &PollConfig) -> Result<Vec<i64>> {
        resilience::wait_for_instructions(self, robot_id, poll).await
    }
}

#[async_trait]
impl InstructionSource for InstructionClient {
    async fn fetch_instructions(&self, robot_id: Uuid) -> Result<Vec<i64>> {
        InstructionClient::fetch_instructions(self, robot_id).await
    }
}

#[async_trait]
impl ServiceClient for InstructionClient {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn base_url(&self) -> &str {
        self.executor.base_url()
    }

    async fn health_check(&self) -> Result<bool> {
        // Any HTTP answer at the root means the server is up
        match self.executor.probe("/").await {
            Ok(status) => Ok(!status.is_server_error()),
            Err(e) => {
                warn!("Instruction server health check failed: {}", e);
                Ok(false)
            }
        }
    }
}

/// Builder for the instruction client
#[derive(Default)]
pub struct InstructionClientBuilder {
    /// Base URL of the control server
    base_url: Option<String>,

    /// Instruction endpoint path
    instructions_path: Option<String>,

    /// Request timeout
    timeout: Option<Duration>,

    /// Retry configuration
    retry_config: Option<RetryConfig>,

    /// Polling policy
    poll_config: Option<PollConfig>,

    /// Read unset values from the environment
    use_env: bool,
}

impl InstructionClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the `ROBOT_SERVER_*` environment instead of the defaults
    pub fn from_env(mut self) -> Self {
        self.use_env = true;
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the instruction endpoint path
    pub fn instructions_path(mut self, path: impl Into<String>) -> Self {
        self.instructions_path = Some(path.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set retry configuration
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Set the polling policy
    pub fn poll(mut self, config: PollConfig) -> Self {
        self.poll_config = Some(config);
        self
    }

    /// Build the instruction client
    pub fn build(self) -> Result<InstructionClient> {
        let mut config = if self.use_env {
            ServerConfig::from_provider(&**DEFAULT_PROVIDER)?
        } else {
            ServerConfig::default()
        };

        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }

        if let Some(path) = self.instructions_path {
            config.instructions_path = path;
        }

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(ServiceError::validation("Timeout must be greater than zero"));
            }
            config.timeout_seconds = timeout.as_secs().max(1);
        }

        if let Some(poll) = self.poll_config {
            config.poll_interval = poll.interval;
            config.max_poll_attempts = poll.max_attempts;
        }

        config.validate()?;

        let mut builder = ClientBuilder::from_config(&config);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(retry) = self.retry_config {
            config.max_retries = retry.max_retries;
            builder = builder.retry_config(retry);
        }

        let executor = builder.build_executor(SERVICE_NAME)?;
        Ok(InstructionClient { executor, config })
    }
}
