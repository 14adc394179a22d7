//! Bounded polling for pending instructions
//!
//! A robot that has nothing to do asks the control server again and again
//! until a non-empty instruction list shows up. The loop here always ends:
//! after `max_attempts` polls it reports a timeout.

use std::time::Duration;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::core::InstructionSource;
use crate::error::{ErrorContext, Result, ServiceError};

/// Polling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between two polls
    pub interval: Duration,

    /// Number of polls before giving up
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

impl From<&ServerConfig> for PollConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            interval: config.poll_interval,
            max_attempts: config.max_poll_attempts,
        }
    }
}

/// Poll `source` until it returns a non-empty instruction list
///
/// Empty lists and failures both mean "try again later". When every attempt
/// is used up the result is a timeout error carrying the last failure, if any.
pub async fn wait_for_instructions<S>(
    source: &S,
    robot_id: Uuid,
    config: &PollConfig,
) -> Result<Vec<i64>>
where
    S: InstructionSource + ?Sized,
{
    let max_attempts = config.max_attempts.max(1);
    let mut last_error: Option<ServiceError> = None;

    info!("Waiting for instructions for robot {}", robot_id);

    for attempt in 1..=max_attempts {
        match source.fetch_instructions(robot_id).await {
            Ok(blocks) if !blocks.is_empty() => {
                info!(
                    "Received instruction blocks for robot {} after {} poll(s): {:?}",
                    robot_id, attempt, blocks
                );
                return Ok(blocks);
            }
            Ok(_) => {
                debug!("No pending instructions for robot {} (poll {}/{})", robot_id, attempt, max_attempts);
            }
            Err(err) => {
                warn!("Polling instructions for robot {} failed (poll {}/{}): {}", robot_id, attempt, max_attempts, err);
                last_error = Some(err);
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(config.interval).await;
        }
    }

    let mut context = ErrorContext::for_service("instructions")
        .with("robot_id", robot_id)
        .with("attempts", max_attempts);
    if let Some(err) = last_error {
        context.add("last_error", err);
    }

    Err(ServiceError::timeout(format!(
        "No instructions for robot {} after {} poll(s)",
        robot_id, max_attempts
    ))
    .with_context(context))
}
