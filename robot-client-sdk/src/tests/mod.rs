//! Unit tests for the Robot Client SDK
//!
//! This module contains tests for the components of the SDK.

pub mod config_tests;
pub mod error_tests;
pub mod reporting_mock_tests;
