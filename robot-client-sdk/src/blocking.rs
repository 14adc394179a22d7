//! Blocking facade over the async clients
//!
//! Robot firmware loops and simple scripts usually have no async runtime.
//! [`BlockingInstructionClient`] owns a current-thread tokio runtime and
//! drives the async clients on it, so every call blocks until the request
//! finishes.
//!
//! Like `reqwest::blocking`, this client must not be created, used or
//! dropped from within an async runtime.

use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::{Result, ServiceError};
use crate::resilience::PollConfig;
use crate::services::instructions::InstructionClient;
use crate::services::reporting::{Acknowledgement, MissionSummary, ReportingClient, TelemetryReport};

/// Synchronous robot client
#[derive(Debug)]
pub struct BlockingInstructionClient {
    instructions: InstructionClient,
    reporting: ReportingClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingInstructionClient {
    /// Create a blocking client with the given configuration
    pub fn new(config: ServerConfig) -> Result<Self> {
        let instructions = InstructionClient::new_with_config(config.clone())?;
        let reporting = ReportingClient::new_with_config(config)?;
        Self::from_clients(instructions, reporting)
    }

    /// Create a blocking client from the `ROBOT_SERVER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ServerConfig::from_env()?)
    }

    /// Wrap already configured async clients
    pub fn from_clients(instructions: InstructionClient, reporting: ReportingClient) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ServiceError::internal(format!("Failed to start runtime: {}", e)))?;

        Ok(Self {
            instructions,
            reporting,
            runtime,
        })
    }

    /// Current configuration
    pub fn config(&self) -> &ServerConfig {
        self.instructions.config()
    }

    /// Blocking form of [`InstructionClient::fetch_instructions`]
    pub fn fetch_instructions(&self, robot_id: Uuid) -> Result<Vec<i64>> {
        self.runtime.block_on(self.instructions.fetch_instructions(robot_id))
    }

    /// Blocking form of [`InstructionClient::fetch_instructions_or_empty`]
    pub fn fetch_instructions_or_empty(&self, robot_id: Uuid) -> Vec<i64> {
        self.runtime.block_on(self.instructions.fetch_instructions_or_empty(robot_id))
    }

    /// Blocking form of [`InstructionClient::wait_for_instructions`]
    pub fn wait_for_instructions(&self, robot_id: Uuid, poll: &PollConfig) -> Result<Vec<i64>> {
        self.runtime.block_on(self.instructions.wait_for_instructions(robot_id, poll))
    }

    /// Blocking form of [`ReportingClient::send_telemetry`]
    pub fn send_telemetry(&self, report: &TelemetryReport) -> Result<Acknowledgement> {
        self.runtime.block_on(self.reporting.send_telemetry(report))
    }

    /// Blocking form of [`ReportingClient::send_summary`]
    pub fn send_summary(&self, summary: &MissionSummary) -> Result<Acknowledgement> {
        self.runtime.block_on(self.reporting.send_summary(summary))
    }
}
