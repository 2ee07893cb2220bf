//! Billing function handlers
//!
//! The three decision-bearing endpoints: checkout session creation,
//! customer portal session creation, and subscription reconciliation.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use videocut_types::{CheckoutRequest, CheckoutSession, Entitlement, PortalRequest, PortalSession};

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /functions/create-checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutSession>> {
    let start = Instant::now();

    let session = state.billing.create_checkout(&user.email, &req).await?;

    metrics::counter!("billing_checkouts_created_total").increment(1);
    metrics::histogram!("billing_operation_duration_seconds", "operation" => "create_checkout")
        .record(start.elapsed().as_secs_f64());

    tracing::info!(user_id = %user.user_id, plan_id = %req.plan_id, "Checkout session created");

    Ok(Json(session))
}

/// POST /functions/customer-portal
pub async fn customer_portal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PortalRequest>,
) -> ApiResult<Json<PortalSession>> {
    let start = Instant::now();

    let portal = state
        .billing
        .create_portal(&user.email, &req.return_url)
        .await?;

    metrics::counter!("billing_portals_created_total").increment(1);
    metrics::histogram!("billing_operation_duration_seconds", "operation" => "customer_portal")
        .record(start.elapsed().as_secs_f64());

    Ok(Json(portal))
}

/// POST /functions/check-subscription
pub async fn check_subscription(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Entitlement>> {
    let start = Instant::now();

    let entitlement = state.billing.reconcile(user.user_id, &user.email).await?;

    metrics::counter!(
        "billing_reconciliations_total",
        "subscribed" => if entitlement.subscribed { "true" } else { "false" }
    )
    .increment(1);
    metrics::histogram!("billing_operation_duration_seconds", "operation" => "check_subscription")
        .record(start.elapsed().as_secs_f64());

    tracing::info!(
        user_id = %user.user_id,
        subscribed = entitlement.subscribed,
        status = %entitlement.status,
        "Subscription reconciled"
    );

    Ok(Json(entitlement))
}
