//! Shared-secret authorization
//!
//! Protected routes compare the raw `Authorization` header against a static
//! secret loaded at startup. There is no token scheme, no expiry and no
//! per-user identity.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use crate::core::error::GatewayError;

/// Value of the `Authorization` header, or `""` when it is absent.
///
/// A header that is not valid visible ASCII can never match a secret loaded
/// from the environment file, so it is reported as `None`.
pub fn authorization_value(headers: &HeaderMap) -> Option<&str> {
    match headers.get(AUTHORIZATION) {
        Some(value) => value.to_str().ok(),
        None => Some(""),
    }
}

/// Check the request headers against the shared secret
///
/// The comparison is exact. An absent header is treated as the empty string,
/// so an empty configured secret accepts requests that send no header.
pub fn authorize(headers: &HeaderMap, secret: &str) -> Result<(), GatewayError> {
    match authorization_value(headers) {
        Some(provided) if provided == secret => Ok(()),
        _ => Err(GatewayError::Unauthorized),
    }
}
