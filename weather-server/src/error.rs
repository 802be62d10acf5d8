//! HTTP error mapping.
//!
//! Every failure leaves the endpoint as `{ "error": "<fixed message>" }`.
//! Underlying causes are logged here and never serialized.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use weather_core::{LookupError, QueryError};

pub const NOT_FOUND_MESSAGE: &str = "Location not found. Please try again.";
pub const UPSTREAM_MESSAGE: &str = "Failed to fetch weather data";
pub const NOT_CONFIGURED_MESSAGE: &str = "Weather service not configured";
pub const TIMEOUT_MESSAGE: &str = "Weather service timed out";
pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Location not found")]
    NotFound,

    /// Upstream answered with a non-success status; it is passed through.
    #[error("Upstream error: HTTP {0}")]
    Upstream(u16),

    /// The provider credential is missing from the deployment.
    #[error("Weather service not configured")]
    ServiceUnavailable,

    #[error("Gateway timeout")]
    GatewayTimeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upstream(status) => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::ServiceUnavailable | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::NotFound => NOT_FOUND_MESSAGE.to_string(),
            Self::Upstream(_) => UPSTREAM_MESSAGE.to_string(),
            Self::ServiceUnavailable => NOT_CONFIGURED_MESSAGE.to_string(),
            Self::GatewayTimeout => TIMEOUT_MESSAGE.to_string(),
            Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(cause) => error!(%cause, "Unexpected error"),
            Self::ServiceUnavailable => error!("OPENWEATHER_API_KEY not configured"),
            _ => {}
        }

        (self.status(), Json(ErrorResponse { error: self.message() })).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::LocationNotFound => Self::NotFound,
            LookupError::Upstream { status } => Self::Upstream(status),
            LookupError::Timeout => Self::GatewayTimeout,
            LookupError::Internal(cause) => Self::Internal(cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_errors_map_to_statuses() {
        let cases = [
            (LookupError::LocationNotFound, StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            (LookupError::Upstream { status: 401 }, StatusCode::UNAUTHORIZED, UPSTREAM_MESSAGE),
            (LookupError::Upstream { status: 503 }, StatusCode::SERVICE_UNAVAILABLE, UPSTREAM_MESSAGE),
            (LookupError::Timeout, StatusCode::GATEWAY_TIMEOUT, TIMEOUT_MESSAGE),
            (
                LookupError::Internal("expected value at line 1".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE,
            ),
        ];

        for (lookup, status, message) in cases {
            let api = ApiError::from(lookup);
            assert_eq!(api.status(), status);
            assert_eq!(api.message(), message);
        }
    }

    #[test]
    fn nonsense_upstream_status_becomes_bad_gateway() {
        assert_eq!(ApiError::Upstream(302).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::Upstream(1000).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_cause_is_not_exposed() {
        let api = ApiError::Internal("/home/deploy/secret.rs:42".into());
        assert!(!api.message().contains("secret"));
    }

    #[test]
    fn missing_location_message() {
        let api = ApiError::from(QueryError::MissingLocation);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.message(), "City or coordinates (lat/lon) are required");
    }
}
