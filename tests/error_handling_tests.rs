//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error bodies carry exactly the client-facing message
//! - Row conversion errors map to the right request error

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use serde_json::{Value, json};
use tablegate::core::error::{INVALID_ID, MISSING_ID, MISSING_ID_OR_WHAT};
use tablegate::prelude::*;

async fn body_of(err: GatewayError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn driver_error(text: &str) -> sqlx::Error {
    sqlx::Error::Protocol(text.to_string())
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_unauthorized_returns_401() {
        assert_eq!(
            GatewayError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_missing_parameters_return_400() {
        for msg in [MISSING_ID_OR_WHAT, MISSING_ID, INVALID_ID] {
            assert_eq!(
                GatewayError::MissingParameter(msg).status_code(),
                StatusCode::BAD_REQUEST
            );
        }
    }

    #[test]
    fn test_database_failures_return_500() {
        let errors = [
            GatewayError::Connect(driver_error("bad uri")),
            GatewayError::Fetch(driver_error("x")),
            GatewayError::Insert(driver_error("x")),
            GatewayError::Update(driver_error("x")),
            GatewayError::Delete(driver_error("x")),
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_row_failures_return_500() {
        let err = GatewayError::from(RowError::NonFinite {
            column: "amount".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Error Message Tests
// =============================================================================

mod message_tests {
    use super::*;

    #[test]
    fn test_messages_are_fixed_strings() {
        let cases = [
            (GatewayError::Unauthorized, "Invalid auth"),
            (
                GatewayError::MissingParameter(MISSING_ID_OR_WHAT),
                "Missing 'id' or 'what' parameter",
            ),
            (GatewayError::MissingParameter(MISSING_ID), "Missing 'id' parameter"),
            (GatewayError::MissingParameter(INVALID_ID), "Invalid id"),
            (
                GatewayError::Connect(driver_error("secret host")),
                "Error connecting to database",
            ),
            (GatewayError::Fetch(driver_error("secret")), "Error fetching data"),
            (GatewayError::Update(driver_error("secret")), "Error updating data"),
            (GatewayError::Delete(driver_error("secret")), "Error deleting data"),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_response().msg, expected);
        }
    }

    #[test]
    fn test_insert_message_carries_driver_text() {
        let err = GatewayError::Insert(driver_error("column \"nope\" does not exist"));
        assert_eq!(
            err.to_string(),
            "Error inserting data: encountered unexpected or invalid data: column \"nope\" does not exist"
        );
    }

    #[test]
    fn test_encode_failure_is_a_marshal_error() {
        let source = serde_json::from_str::<Value>("{").unwrap_err();
        let err = GatewayError::from(RowError::from(source));
        assert!(matches!(err, GatewayError::Marshal(_)));
        assert_eq!(err.to_string(), "Error marshalling data");
    }

    #[test]
    fn test_decode_failure_is_a_scan_error() {
        let err = GatewayError::from(RowError::Decode {
            column: "vat".to_string(),
            source: sqlx::Error::ColumnNotFound("vat".to_string()),
        });
        assert!(matches!(err, GatewayError::Scan(_)));
        assert_eq!(err.to_string(), "Error scanning data");
    }
}

// =============================================================================
// IntoResponse Tests
// =============================================================================

mod into_response_tests {
    use super::*;

    #[tokio::test]
    async fn test_unauthorized_into_response() {
        let (status, body) = body_of(GatewayError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "msg": "Invalid auth" }));
    }

    #[tokio::test]
    async fn test_fetch_error_body_hides_source() {
        let (status, body) = body_of(GatewayError::Fetch(driver_error("password=hunter2"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "msg": "Error fetching data" }));
    }

    #[tokio::test]
    async fn test_body_has_only_msg() {
        let (_, body) = body_of(GatewayError::MissingParameter(INVALID_ID)).await;
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["msg"], "Invalid id");
    }

    #[test]
    fn test_response_is_json() {
        let response = GatewayError::Unauthorized.into_response();
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}

// =============================================================================
// Config Error Tests
// =============================================================================

mod config_error_tests {
    use super::*;

    #[test]
    fn test_missing_env_file_names_the_path() {
        let err = GatewayConfig::load("/nonexistent/tablegate/.env").unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
        assert!(err.to_string().contains("/nonexistent/tablegate/.env"));
    }
}
