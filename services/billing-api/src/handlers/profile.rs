//! Profile handlers

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use videocut_db::{ProfileRepository, UpdateProfile};
use videocut_types::Profile;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Profile>> {
    let row = state
        .repos
        .profiles
        .find_by_id(user.user_id.0)
        .await?
        .ok_or(ApiError::ProfileNotFound)?;

    Ok(Json(row.to_profile()))
}

/// PATCH /api/v1/profile
///
/// Only the owner-mutable fields; the subscription tier is written solely
/// by the reconciler.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Profile>> {
    let row = state
        .repos
        .profiles
        .update_details(
            user.user_id.0,
            UpdateProfile {
                display_name: req.display_name,
                bio: req.bio,
                avatar_url: req.avatar_url,
            },
        )
        .await?;

    tracing::info!(user_id = %user.user_id, "Profile updated");

    Ok(Json(row.to_profile()))
}
