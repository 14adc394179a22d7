//! Core abstractions for the Robot Client SDK
//!
//! This module provides the trait interfaces the service clients implement
//! or use:
//!
//! - `ServiceClient`: The base trait for all service clients
//! - `RequestExecutor`: Handles actual HTTP requests
//! - `InstructionSource`: Anything that can hand out instructions for a robot
//! - `ClientBuilder`: Builder pattern for creating clients

pub mod builder;
pub use builder::ClientBuilder;

use async_trait::async_trait;
use std::collections::HashMap;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::Result;

/// Base trait for all service clients
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// The client name/identifier
    fn name(&self) -> &str;

    /// The base URL for the service
    fn base_url(&self) -> &str;

    /// Health check for the service
    async fn health_check(&self) -> Result<bool>;
}

/// Trait responsible for executing HTTP requests with strong typing
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute a GET request; only `200 OK` counts as success
    async fn get<R>(&self, endpoint: &str, query_params: Option<HashMap<String, String>>) -> Result<R>
    where
        R: DeserializeOwned + Send;

    /// Execute a POST request with a JSON body; any 2xx counts as success
    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send;
}

/// Source of instruction blocks for a robot
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstructionSource: Send + Sync {
    /// Fetch the pending instruction blocks for `robot_id`, in server order
    async fn fetch_instructions(&self, robot_id: Uuid) -> Result<Vec<i64>>;
}
