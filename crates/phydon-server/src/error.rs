//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use phydon_common::PhydonError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Lookup(#[from] PhydonError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(PhydonError::InvalidStat(_)) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(PhydonError::NotBuilt { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Lookup(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Lookup(PhydonError::NotBuilt { ref rank, ref reason }) => {
                tracing::error!(rank = %rank, reason = %reason, "Aggregate table unavailable");
                self.to_string()
            },
            ApiError::Lookup(ref e) if status.is_server_error() => {
                tracing::error!("Lookup error: {:?}", e);
                "An internal error occurred".to_string()
            },
            ApiError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                "An internal error occurred".to_string()
            },
            ref other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
