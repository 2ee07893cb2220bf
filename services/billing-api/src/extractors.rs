//! Axum extractors for authentication

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};

use videocut_db::{ProfileRepository, SessionRepository};
use videocut_types::UserId;

use crate::state::AppState;

/// Authenticated user extracted from the request's session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
}

/// Error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: &'static str,
}

/// Auth rejection type
pub struct AuthRejection {
    status: StatusCode,
    message: &'static str,
}

impl AuthRejection {
    fn unauthorized(message: &'static str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = extract_token(parts)?;

        // Sessions are stored by token hash, never by the raw token
        let session = app_state
            .repos
            .sessions
            .find_by_token_hash(&hash_token(&token))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Session lookup failed");
                AuthRejection::unauthorized("Invalid or expired session")
            })?
            .filter(|s| s.is_valid(Utc::now()))
            .ok_or_else(|| AuthRejection::unauthorized("Invalid or expired session"))?;

        let profile = app_state
            .repos
            .profiles
            .find_by_id(session.user_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Profile lookup failed");
                AuthRejection::unauthorized("Invalid or expired session")
            })?
            .ok_or_else(|| AuthRejection::unauthorized("Invalid or expired session"))?;

        Ok(AuthUser {
            user_id: UserId(profile.id),
            email: profile.email,
        })
    }
}

/// Extract the bearer token from the Authorization header
fn extract_token(parts: &Parts) -> Result<String, AuthRejection> {
    if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| AuthRejection {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid Authorization header encoding",
        })?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.to_string());
        }
    }

    Err(AuthRejection::unauthorized(
        "No authentication token provided",
    ))
}

/// SHA-256 hash of a session token, hex encoded
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(digest)
}
