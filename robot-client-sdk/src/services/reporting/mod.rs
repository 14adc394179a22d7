//! Reporting client implementation
//!
//! While a mission runs the robot posts telemetry samples to `/telemetry`,
//! and once it is over a summary to `/summary`. Both endpoints answer
//! `{"status": "ok"}`.

mod models;
pub use models::*;

use async_trait::async_trait;
use log::{debug, warn};

use crate::config::{ServerConfig, ServiceConfig};
use crate::core::{ClientBuilder, RequestExecutor, ServiceClient};
use crate::error::{Result, ServiceError};
use crate::services::common::HttpExecutor;

/// Service name used in logs and error context
pub const SERVICE_NAME: &str = "reporting";

/// Client for the telemetry and summary endpoints
#[derive(Debug, Clone)]
pub struct ReportingClient {
    /// HTTP executor
    executor: HttpExecutor,

    /// Configuration
    config: ServerConfig,
}

impl ReportingClient {
    /// Create a client from the `ROBOT_SERVER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new_with_config(ServerConfig::from_env()?)
    }

    /// Create a new client with custom configuration
    pub fn new_with_config(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let executor = ClientBuilder::from_config(&config).build_executor(SERVICE_NAME)?;
        Ok(Self { executor, config })
    }

    /// Current configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Send one telemetry sample
    pub async fn send_telemetry(&self, report: &TelemetryReport) -> Result<Acknowledgement> {
        ensure_finite("speed", report.speed)?;
        ensure_finite("ultrasonic distance", report.ultrasonic_distance)?;

        debug!(
            "Telemetry for robot {}: line={}, speed={:.3}",
            report.robot_id, report.line, report.speed
        );

        let ack: Acknowledgement = self.executor.post(&self.config.telemetry_path, report).await?;
        Self::check_ack(ack, &self.config.telemetry_path)
    }

    /// Send the end-of-mission summary
    pub async fn send_summary(&self, summary: &MissionSummary) -> Result<Acknowledgement> {
        ensure_finite("average speed", summary.average_speed)?;

        debug!(
            "Summary for robot {}: average_speed={:.3}",
            summary.robot_id, summary.average_speed
        );

        let ack: Acknowledgement = self.executor.post(&self.config.summary_path, summary).await?;
        Self::check_ack(ack, &self.config.summary_path)
    }

    fn check_ack(ack: Acknowledgement, endpoint: &str) -> Result<Acknowledgement> {
        if !ack.is_ok() {
            warn!("Server did not accept report on {}: status={}", endpoint, ack.status);
        }
        Ok(ack)
    }
}

// serde_json writes NaN and infinities as null, which the server rejects
fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ServiceError::validation(format!(
            "{} must be a finite number, got {}",
            field, value
        )))
    }
}

#[async_trait]
impl ServiceClient for ReportingClient {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn base_url(&self) -> &str {
        self.executor.base_url()
    }

    async fn health_check(&self) -> Result<bool> {
        match self.executor.probe("/").await {
            Ok(status) => Ok(!status.is_server_error()),
            Err(e) => {
                warn!("Reporting server health check failed: {}", e);
                Ok(false)
            }
        }
    }
}
