//! Error mapping for robot control server responses
//!
//! The control server is a FastAPI application, so error bodies usually look
//! like `{"detail": "..."}`. This module turns a non-success status and its
//! body into a normalized ServiceError.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError};
use crate::util::truncate_string;

/// Longest body excerpt kept in an error message
const MAX_BODY_EXCERPT: usize = 100;

/// Pull a human readable message out of a JSON error body
fn extract_message(json: &Value) -> Option<String> {
    let field = json
        .get("detail")
        .or_else(|| json.get("message"))
        .or_else(|| json.get("error"))?;

    match field {
        Value::String(s) => Some(s.clone()),
        // FastAPI validation failures carry a list of objects under "detail"
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                Some(field.to_string())
            } else {
                Some(messages.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

/// Map a non-success HTTP response to a ServiceError
pub fn map_http_error(
    status: StatusCode,
    body: &str,
    context: &mut ErrorContext,
) -> ServiceError {
    context.status_code = Some(status.as_u16());
    context.add("category", classify_http_error(status));

    let message = match serde_json::from_str::<Value>(body).ok().as_ref().and_then(extract_message) {
        Some(detail) => format!("{}: {}", status, detail),
        None if body.trim().is_empty() => status.to_string(),
        None => format!("{}: {}", status, truncate_string(body.trim(), MAX_BODY_EXCERPT)),
    };

    match status {
        StatusCode::NOT_FOUND => ServiceError::not_found(message),
        StatusCode::TOO_MANY_REQUESTS => ServiceError::rate_limit(message),
        _ => ServiceError::service(message),
    }
}

/// Helper function to classify HTTP errors by category
pub fn classify_http_error(status: StatusCode) -> &'static str {
    match status.as_u16() {
        200..=299 => "unexpected_success",
        300..=399 => "redirect",
        400 => "validation",
        401 => "authentication",
        403 => "authorization",
        404 => "not_found",
        408 => "timeout",
        422 => "validation",
        429 => "rate_limit",
        500..=599 => "server",
        _ => "unknown",
    }
}

/// Determine if an HTTP status code indicates a retryable error
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500 | 502 | 503 | 504)
}
