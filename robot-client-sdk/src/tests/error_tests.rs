//! Tests for error handling functionality
//!
//! These tests verify that the error system in the SDK works correctly.

#[cfg(test)]
mod tests {
    use crate::error::{ErrorContext, ErrorKind, Result, ServiceError};
    use crate::services::instructions::InstructionEnvelope;

    #[test]
    fn test_service_error_creation() {
        let network_err = ServiceError::network("Connection failed");
        let parse_err = ServiceError::parsing("missing field `blocks`");
        let rate_limit_err = ServiceError::rate_limit("Too many requests");

        assert_eq!(network_err.to_string(), "Network error: Connection failed");
        assert_eq!(parse_err.to_string(), "Parsing error: missing field `blocks`");
        assert_eq!(rate_limit_err.to_string(), "Rate limit exceeded: Too many requests");

        assert!(network_err.is_retryable());
        assert!(!parse_err.is_retryable());
        assert!(rate_limit_err.is_retryable());
        assert!(parse_err.is_permanent());
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(ServiceError::network("x").kind(), ErrorKind::Transport);
        assert_eq!(ServiceError::timeout("x").kind(), ErrorKind::Transport);
        assert_eq!(ServiceError::service("x").kind(), ErrorKind::Server);
        assert_eq!(ServiceError::not_found("x").kind(), ErrorKind::Server);
        assert_eq!(ServiceError::parsing("x").kind(), ErrorKind::Parse);
        assert_eq!(ServiceError::configuration("x").kind(), ErrorKind::Configuration);
        assert_eq!(ServiceError::validation("x").kind(), ErrorKind::Configuration);
        assert_eq!(ServiceError::internal("x").kind(), ErrorKind::Internal);
        assert_eq!(ErrorKind::Server.to_string(), "server");
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::for_service("instructions")
            .status_code(503)
            .endpoint("/get_instructions")
            .with("attempt", 3);

        let err = ServiceError::service("503 Service Unavailable").with_context(context);

        assert_eq!(err.service_name(), Some("instructions"));
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.endpoint(), Some("/get_instructions"));
        assert_eq!(err.context_value("attempt"), Some("3"));
        assert_eq!(err.kind(), ErrorKind::Server);
        assert!(err.to_string().contains("503 Service Unavailable"));

        // 503 is transient even though a plain service error is not
        assert!(err.is_retryable());
        assert!(!ServiceError::service("503 Service Unavailable").is_retryable());
    }

    #[test]
    fn test_nested_context_lookup() {
        let err = ServiceError::service("500 Internal Server Error")
            .with_context(ErrorContext::for_service("instructions").status_code(500))
            .with_context_value("robot_id", "255f30bc-46f7-41d4-ba1d-db76a0afd7f7");

        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.service_name(), Some("instructions"));
        assert_eq!(err.context_value("robot_id"), Some("255f30bc-46f7-41d4-ba1d-db76a0afd7f7"));
        assert!(matches!(err.root(), ServiceError::Service(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_service_name_without_named_layer() {
        let err = ServiceError::network("connection refused").with_context_value("attempts", 2);
        assert_eq!(err.service_name(), Some("unknown"));
        assert_eq!(ServiceError::network("connection refused").service_name(), None);
    }

    #[test]
    fn test_non_retryable_status_in_context() {
        let err = ServiceError::service("400 Bad Request")
            .with_context(ErrorContext::new().status_code(400));
        assert!(err.is_permanent());
    }

    #[test]
    fn test_from_serde_json_error() {
        let result: Result<InstructionEnvelope> =
            serde_json::from_str::<InstructionEnvelope>("{\"blocks\": [1,").map_err(ServiceError::from);

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.service_name(), Some("json"));
    }

    #[test]
    fn test_from_url_error() {
        let err: ServiceError = url::Url::parse("no scheme").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
