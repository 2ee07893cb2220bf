//! Plan catalog handler

use axum::Json;

use videocut_types::{Plan, PLANS};

/// GET /api/v1/plans
///
/// Serves the static pricing catalog; no authentication required.
pub async fn list_plans() -> Json<&'static [Plan]> {
    Json(PLANS)
}
