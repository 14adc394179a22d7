//! Resilience patterns for robot clients
//!
//! This module provides:
//! - Retry with exponential backoff (opt-in, bounded)
//! - Bounded polling for pending instructions

mod retry;
pub mod poll;

pub use retry::{RetryExecutor, RetryConfig};
pub use poll::{PollConfig, wait_for_instructions};
