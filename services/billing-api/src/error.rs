//! Error types for the Billing API service.
//!
//! The wire contract is intentionally coarse: handlers return 200 with a
//! recognized outcome, 401 when the caller is not authenticated, and 500
//! with `{"error": message}` for everything else. Finer distinctions live
//! in the typed errors and the logs, not in the status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("{0}")]
    Database(#[from] videocut_db::DbError),

    #[error("{0}")]
    Billing(#[from] videocut_billing_core::BillingError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::ProfileNotFound | Self::Database(_) | Self::Billing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
