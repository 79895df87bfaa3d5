//! Typed error handling for the gateway
//!
//! Every failure ends the handling of a single request and is reported to
//! the caller as one JSON object of the shape `{"msg": "<text>"}`.
//!
//! # Error Categories
//!
//! - [`GatewayError`]: request-level failures, each mapped to an HTTP status
//! - [`ConfigError`]: startup failures (fatal for the process)
//! - [`RowError`]: failures while turning result rows into JSON
//!
//! The `Display` text of a [`GatewayError`] is exactly what the client sees.
//! Backend detail is only included for inserts; every other path logs the
//! underlying error with `tracing` and returns a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Message returned when `/get` is called without a column selector
pub const MISSING_ID_OR_WHAT: &str = "Missing 'id' or 'what' parameter";

/// Message returned when `/upd` is called without an `id`
pub const MISSING_ID: &str = "Missing 'id' parameter";

/// Message returned when `/del` is called without an `id`
pub const INVALID_ID: &str = "Invalid id";

/// The main error type for request handling
#[derive(Debug, Error)]
pub enum GatewayError {
    /// `Authorization` header did not match the shared secret
    #[error("Invalid auth")]
    Unauthorized,

    /// A required query parameter was absent or empty
    #[error("{0}")]
    MissingParameter(&'static str),

    /// The connection URI was rejected by the driver
    #[error("Error connecting to database")]
    Connect(#[source] sqlx::Error),

    /// The read query failed
    #[error("Error fetching data")]
    Fetch(#[source] sqlx::Error),

    /// The insert failed; the driver text is part of the message
    #[error("Error inserting data: {0}")]
    Insert(#[source] sqlx::Error),

    /// The update failed
    #[error("Error updating data")]
    Update(#[source] sqlx::Error),

    /// The delete failed
    #[error("Error deleting data")]
    Delete(#[source] sqlx::Error),

    /// A result column could not be decoded
    #[error("Error scanning data")]
    Scan(#[source] RowError),

    /// The response body could not be encoded
    #[error("Error marshalling data")]
    Marshal(#[source] RowError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub msg: String,
}

impl GatewayError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            GatewayError::Connect(_)
            | GatewayError::Fetch(_)
            | GatewayError::Insert(_)
            | GatewayError::Update(_)
            | GatewayError::Delete(_)
            | GatewayError::Scan(_)
            | GatewayError::Marshal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            msg: self.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            match std::error::Error::source(&self) {
                Some(source) => tracing::warn!(error = %source, "{}", self),
                None => tracing::warn!("{}", self),
            }
        }
        (status, Json(self.to_response())).into_response()
    }
}

impl From<RowError> for GatewayError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Decode { .. } => GatewayError::Scan(err),
            RowError::NonFinite { .. } | RowError::Encode(_) => GatewayError::Marshal(err),
        }
    }
}

// =============================================================================
// Row Errors
// =============================================================================

/// Errors raised while converting result rows into JSON
#[derive(Debug, Error)]
pub enum RowError {
    /// A column value could not be decoded into its JSON counterpart
    #[error("failed to decode column '{column}': {source}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::Error,
    },

    /// A floating point value has no JSON representation
    #[error("column '{column}' holds a non-finite number")]
    NonFinite { column: String },

    /// The encoded body could not be produced
    #[error("failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while loading configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment file is missing or malformed
    #[error("failed to load environment file '{path}': {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },

    /// The listen address could not be parsed
    #[error("invalid listen address '{value}': {source}")]
    InvalidListenAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for request handlers
pub type GatewayResult<T> = Result<T, GatewayError>;

// =============================================================================
// Tests
// =============================================================================
