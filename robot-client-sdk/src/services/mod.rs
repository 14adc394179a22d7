//! Service-specific client implementations
//!
//! This module contains the clients for the robot control server endpoints.

pub mod instructions;
pub mod reporting;
pub(crate) mod common;

pub use common::{HttpExecutor, UserAgent};
