//! Wire contract tests
//!
//! Pin the JSON shapes of the billing function endpoints so client and
//! server cannot drift apart silently.

use serde_json::json;

use videocut_types::{CheckoutRequest, Entitlement, PortalRequest, SubscriptionStatus, Tier};

// ============================================================================
// Request Bodies
// ============================================================================

#[test]
fn test_checkout_request_body_shape() {
    let body = json!({
        "plan_id": "premium",
        "plan_name": "Premium",
        "plan_price_in_cents": 1200,
        "success_url": "https://videocut.test/success",
        "cancel_url": "https://videocut.test/pricing"
    });

    let req: CheckoutRequest = serde_json::from_value(body).unwrap();
    assert_eq!(req.plan_id, "premium");
    assert_eq!(req.plan_price_in_cents, 1_200);
}

#[test]
fn test_checkout_request_rejects_missing_fields() {
    let body = json!({ "plan_id": "premium" });
    assert!(serde_json::from_value::<CheckoutRequest>(body).is_err());
}

#[test]
fn test_portal_request_body_shape() {
    let body = json!({ "return_url": "https://videocut.test/settings" });
    let req: PortalRequest = serde_json::from_value(body).unwrap();
    assert_eq!(req.return_url, "https://videocut.test/settings");
}

// ============================================================================
// Response Bodies
// ============================================================================

#[test]
fn test_entitlement_response_keys() {
    let entitlement = Entitlement {
        subscribed: true,
        subscription_tier: Some(Tier::Pro),
        current_period_end: Some(chrono::Utc::now()),
        status: SubscriptionStatus::Active,
    };

    let value = serde_json::to_value(&entitlement).unwrap();
    let obj = value.as_object().unwrap();

    assert_eq!(obj["subscribed"], json!(true));
    assert_eq!(obj["subscription_tier"], json!("pro"));
    assert_eq!(obj["status"], json!("active"));
    assert!(obj.contains_key("current_period_end"));
}

#[test]
fn test_inactive_entitlement_response() {
    let value = serde_json::to_value(Entitlement::inactive()).unwrap();

    assert_eq!(value["subscribed"], json!(false));
    assert_eq!(value["subscription_tier"], json!(null));
    assert_eq!(value["current_period_end"], json!(null));
    assert_eq!(value["status"], json!("inactive"));
}

#[test]
fn test_plan_catalog_serialization() {
    let value = serde_json::to_value(videocut_types::PLANS).unwrap();
    let plans = value.as_array().unwrap();

    assert_eq!(plans.len(), 3);
    assert_eq!(plans[0]["id"], json!("free"));
    assert_eq!(plans[1]["id"], json!("premium"));
    assert_eq!(plans[1]["popular"], json!(true));
    assert_eq!(plans[2]["price_cents"], json!(2900));
}
