//! Mock tests for the reporting endpoints

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::ServerConfig;
    use crate::error::{ErrorKind, ServiceError};
    use crate::services::reporting::{GripperState, MissionSummary, ReportingClient, TelemetryReport};

    fn create_test_client(mock_server: &MockServer) -> ReportingClient {
        ReportingClient::new_with_config(ServerConfig::new(mock_server.uri()))
            .expect("Failed to build reporting client")
    }

    fn sample_report(robot_id: Uuid) -> TelemetryReport {
        TelemetryReport {
            robot_id,
            speed: 0.75,
            ultrasonic_distance: 12.5,
            movement_status: "AVANCER".to_string(),
            line: 4,
            gripper_status: GripperState::Open,
        }
    }

    #[tokio::test]
    async fn test_send_telemetry() {
        let mock_server = MockServer::start().await;
        let robot_id = Uuid::new_v4();

        Mock::given(method("POST"))
            .and(path("/telemetry"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "robot_id": robot_id.to_string(),
                "vitesse": 0.75,
                "distance_ultrasons": 12.5,
                "statut_deplacement": "AVANCER",
                "ligne": 4,
                "statut_pince": "open"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let ack = client.send_telemetry(&sample_report(robot_id)).await.unwrap();
        assert!(ack.is_ok());
    }

    #[tokio::test]
    async fn test_send_summary() {
        let mock_server = MockServer::start().await;
        let robot_id = Uuid::new_v4();

        Mock::given(method("POST"))
            .and(path("/summary"))
            .and(body_json(json!({
                "robot_id": robot_id.to_string(),
                "average_speed": 0.5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let summary = MissionSummary::from_speeds(robot_id, &[0.25, 0.75]).unwrap();
        assert!(client.send_summary(&summary).await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_created_status_is_accepted_for_reports() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/telemetry"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "status": "ok" })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        assert!(client.send_telemetry(&sample_report(Uuid::new_v4())).await.is_ok());
    }

    #[tokio::test]
    async fn test_validation_error_from_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/telemetry"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "detail": [
                    { "loc": ["body", "ligne"], "msg": "value is not a valid integer", "type": "type_error.integer" }
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let err = client.send_telemetry(&sample_report(Uuid::new_v4())).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status_code(), Some(422));
        assert!(err.to_string().contains("value is not a valid integer"));
        assert!(err.is_permanent());
    }

    #[tokio::test]
    async fn test_non_finite_summary_is_rejected_locally() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let summary = MissionSummary {
            robot_id: Uuid::new_v4(),
            average_speed: f64::NAN,
        };

        let err = client.send_summary(&summary).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_non_finite_telemetry_is_rejected_locally() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/telemetry"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let robot_id = Uuid::new_v4();

        let bad_speed = TelemetryReport {
            speed: f64::NAN,
            ..sample_report(robot_id)
        };
        let err = client.send_telemetry(&bad_speed).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().contains("speed"));

        let bad_distance = TelemetryReport {
            ultrasonic_distance: f64::INFINITY,
            ..sample_report(robot_id)
        };
        let err = client.send_telemetry(&bad_distance).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().contains("ultrasonic distance"));
    }

    #[tokio::test]
    async fn test_unexpected_ack_is_returned() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ignored" })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server);
        let summary = MissionSummary::from_speeds(Uuid::new_v4(), &[1.0]).unwrap();

        let ack = client.send_summary(&summary).await.unwrap();
        assert!(!ack.is_ok());
        assert_eq!(ack.status, "ignored");
    }
}
