//! # Robot Client SDK
//!
//! Client side of the robot control server: what a robot (or a robot
//! simulator) needs to get its instructions and report back.
//!
//! This crate provides:
//!
//! - Typed and lenient instruction fetching (`GET /get_instructions`)
//! - Bounded polling until instructions are available
//! - Telemetry and mission summary reporting
//! - A blocking facade for callers without an async runtime
//! - Configuration management with environment variable support
//! - An error system that tells transport, server and parse failures apart
//!
//! ## Example
//!
//! ```no_run
//! use robot_client_sdk::InstructionClient;
//! use uuid::Uuid;
//!
//! # async fn run() -> robot_client_sdk::Result<()> {
//! let client = InstructionClient::new("http://10.7.5.118:8000")?;
//! let robot_id = Uuid::parse_str("255f30bc-46f7-41d4-ba1d-db76a0afd7f7").unwrap();
//!
//! let blocks = client.fetch_instructions(robot_id).await?;
//! println!("blocks: {:?}", blocks);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub use core::{ServiceClient, RequestExecutor, InstructionSource, ClientBuilder};

pub mod services;
pub use services::instructions::{InstructionClient, InstructionClientBuilder};
pub use services::reporting::{ReportingClient, TelemetryReport, MissionSummary, GripperState, Acknowledgement};

pub mod error;
pub use error::{ServiceError, ErrorContext, ErrorKind, Result};

pub mod resilience;
pub use resilience::{RetryConfig, RetryExecutor, PollConfig};

pub mod config;
pub use config::{ConfigProvider, ServerConfig, ServiceConfig};

pub mod blocking;
pub use blocking::BlockingInstructionClient;

mod util;

#[cfg(test)]
mod tests;

/// Create a new default client builder
pub fn client() -> core::ClientBuilder {
    core::ClientBuilder::new()
}

/// Create an instruction client configured from the environment
pub fn instruction_client() -> Result<InstructionClient> {
    InstructionClient::from_env()
}
