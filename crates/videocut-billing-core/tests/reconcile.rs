//! Integration tests for subscription reconciliation
//!
//! Exercises the reconciler against a scripted payment provider and
//! in-memory repositories: selection precedence, grace periods, tier
//! derivation from price metadata, persistence, and failure tolerance.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};

use common::{provider_sub, MockProfileRepository, MockSubscriberRepository, ScriptedProvider};
use videocut_billing_core::{BillingError, BillingService};
use videocut_db::{ProfileRepository, SubscriberRepository, SubscriberRow, UpsertSubscriber};
use videocut_types::{CheckoutRequest, SubscriptionStatus, Tier, UserId};

type TestService = BillingService<ScriptedProvider, MockProfileRepository, MockSubscriberRepository>;

struct Fixture {
    service: TestService,
    provider: ScriptedProvider,
    profiles: Arc<MockProfileRepository>,
    subscribers: Arc<MockSubscriberRepository>,
    user_id: UserId,
    email: String,
}

fn fixture(email: &str, tier: &str) -> Fixture {
    let provider = ScriptedProvider::new();
    let profiles = Arc::new(MockProfileRepository::new());
    let subscribers = Arc::new(MockSubscriberRepository::new());

    let profile = MockProfileRepository::test_profile(email, tier);
    let user_id = UserId(profile.id);
    profiles.insert_profile(profile);

    let service = BillingService::new(provider.clone(), profiles.clone(), subscribers.clone());

    Fixture {
        service,
        provider,
        profiles,
        subscribers,
        user_id,
        email: email.to_string(),
    }
}

// ============================================================================
// No-customer and no-qualifying-subscription cases
// ============================================================================

#[tokio::test]
async fn test_no_customer_yields_inactive_and_free_tier() {
    let fx = fixture("nobody@example.com", "pro");

    let ent = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();

    assert!(!ent.subscribed);
    assert_eq!(ent.subscription_tier, None);
    assert_eq!(ent.current_period_end, None);
    assert_eq!(ent.status, SubscriptionStatus::Inactive);

    let profile = fx.profiles.find_by_id(fx.user_id.0).await.unwrap().unwrap();
    assert_eq!(profile.subscription_tier, "free");
}

#[tokio::test]
async fn test_no_customer_clears_stale_subscriber_record() {
    let fx = fixture("lapsed@example.com", "premium");

    // Stale record from a previous paid period
    fx.subscribers
        .upsert(UpsertSubscriber {
            user_id: fx.user_id.0,
            stripe_customer_id: Some("cus_old".to_string()),
            stripe_subscription_id: Some("sub_old".to_string()),
            status: "active".to_string(),
            subscription_tier: Some("premium".to_string()),
            current_period_end: Some(Utc::now() + Duration::days(10)),
        })
        .await
        .unwrap();

    let ent = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();
    assert!(!ent.subscribed);

    let row = fx.subscribers.row_for(fx.user_id.0).unwrap();
    assert_eq!(row.status, "inactive");
    assert_eq!(row.subscription_tier, None);
    assert_eq!(row.current_period_end, None);
}

#[tokio::test]
async fn test_customer_without_subscriptions_is_inactive() {
    let fx = fixture("browsing@example.com", "free");
    fx.provider.with_customer(&fx.email, "cus_1");

    let ent = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();

    assert!(!ent.subscribed);
    assert_eq!(ent.status, SubscriptionStatus::Inactive);
}

// ============================================================================
// Selection precedence and grace period
// ============================================================================

#[tokio::test]
async fn test_precedence_trialing_over_recency() {
    let fx = fixture("editor@example.com", "free");
    let now = Utc::now();

    // Most recent by creation is past_due; trialing must still win
    fx.provider.with_customer(&fx.email, "cus_1");
    fx.provider.with_subscriptions(
        "cus_1",
        vec![
            provider_sub(
                "sub_canceled",
                "canceled",
                now - Duration::days(90),
                now - Duration::days(30),
                Some("premium"),
            ),
            provider_sub(
                "sub_trial",
                "trialing",
                now - Duration::days(10),
                now + Duration::days(4),
                Some("pro"),
            ),
            provider_sub(
                "sub_pastdue",
                "past_due",
                now - Duration::days(1),
                now + Duration::days(29),
                Some("premium"),
            ),
        ],
    );

    let ent = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();

    assert!(ent.subscribed);
    assert_eq!(ent.status, SubscriptionStatus::Trialing);
    assert_eq!(ent.subscription_tier, Some(Tier::Pro));

    let row = fx.subscribers.row_for(fx.user_id.0).unwrap();
    assert_eq!(row.stripe_subscription_id.as_deref(), Some("sub_trial"));
}

#[tokio::test]
async fn test_canceled_within_grace_period_is_subscribed() {
    let fx = fixture("grace@example.com", "free");
    let now = Utc::now();

    fx.provider.with_customer(&fx.email, "cus_1");
    fx.provider.with_subscriptions(
        "cus_1",
        vec![provider_sub(
            "sub_1",
            "canceled",
            now - Duration::days(20),
            now + Duration::days(5),
            Some("premium"),
        )],
    );

    let ent = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();

    assert!(ent.subscribed);
    assert_eq!(ent.status, SubscriptionStatus::Canceled);
    assert_eq!(ent.subscription_tier, Some(Tier::Premium));

    let profile = fx.profiles.find_by_id(fx.user_id.0).await.unwrap().unwrap();
    assert_eq!(profile.subscription_tier, "premium");
}

#[tokio::test]
async fn test_canceled_past_period_end_reverts_to_free() {
    let fx = fixture("expired@example.com", "pro");
    let now = Utc::now();

    // Canceled 3 days past the period end: no grace period left
    fx.provider.with_customer(&fx.email, "cus_1");
    fx.provider.with_subscriptions(
        "cus_1",
        vec![provider_sub(
            "sub_1",
            "canceled",
            now - Duration::days(40),
            now - Duration::days(3),
            Some("pro"),
        )],
    );

    let ent = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();

    assert!(!ent.subscribed);
    assert_eq!(ent.subscription_tier, None);
    assert_eq!(ent.status, SubscriptionStatus::Inactive);

    let profile = fx.profiles.find_by_id(fx.user_id.0).await.unwrap().unwrap();
    assert_eq!(profile.subscription_tier, "free");
}

// ============================================================================
// Tier derivation
// ============================================================================

#[tokio::test]
async fn test_active_pro_subscription_end_to_end() {
    let fx = fixture("a@x.com", "free");
    let now = Utc::now();
    let period_end = now + Duration::days(27);

    fx.provider.with_customer(&fx.email, "cus_pro");
    fx.provider.with_subscriptions(
        "cus_pro",
        vec![provider_sub(
            "sub_pro",
            "active",
            now - Duration::days(3),
            period_end,
            Some("pro"),
        )],
    );

    let ent = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();

    assert!(ent.subscribed);
    assert_eq!(ent.subscription_tier, Some(Tier::Pro));
    assert_eq!(ent.status, SubscriptionStatus::Active);
    assert_eq!(ent.current_period_end, Some(period_end));

    let profile = fx.profiles.find_by_id(fx.user_id.0).await.unwrap().unwrap();
    assert_eq!(profile.subscription_tier, "pro");

    let row = fx.subscribers.row_for(fx.user_id.0).unwrap();
    assert_eq!(row.status, "active");
    assert_eq!(row.subscription_tier.as_deref(), Some("pro"));
    assert_eq!(row.stripe_customer_id.as_deref(), Some("cus_pro"));
}

#[tokio::test]
async fn test_tier_comes_from_metadata_not_names() {
    let fx = fixture("metadata@example.com", "free");
    let now = Utc::now();

    // plan_id metadata says premium even though nothing else does; the
    // reconciler must not look anywhere else
    fx.provider.with_customer(&fx.email, "cus_1");
    fx.provider.with_subscriptions(
        "cus_1",
        vec![provider_sub(
            "sub_1",
            "active",
            now,
            now + Duration::days(30),
            Some("premium"),
        )],
    );

    let ent = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();
    assert_eq!(ent.subscription_tier, Some(Tier::Premium));
}

#[tokio::test]
async fn test_missing_plan_metadata_is_an_error() {
    let fx = fixture("broken@example.com", "free");
    let now = Utc::now();

    fx.provider.with_customer(&fx.email, "cus_1");
    fx.provider.with_subscriptions(
        "cus_1",
        vec![provider_sub(
            "sub_1",
            "active",
            now,
            now + Duration::days(30),
            None,
        )],
    );

    let err = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap_err();
    assert!(matches!(err, BillingError::MissingPlanMetadata { .. }));
}

// ============================================================================
// Idempotence and failure tolerance
// ============================================================================

#[tokio::test]
async fn test_reconciliation_is_idempotent() {
    let fx = fixture("steady@example.com", "free");
    let now = Utc::now();

    fx.provider.with_customer(&fx.email, "cus_1");
    fx.provider.with_subscriptions(
        "cus_1",
        vec![provider_sub(
            "sub_1",
            "active",
            now - Duration::days(3),
            now + Duration::days(27),
            Some("premium"),
        )],
    );

    let first = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();
    let row_after_first = fx.subscribers.row_for(fx.user_id.0).unwrap();

    let second = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();
    let row_after_second = fx.subscribers.row_for(fx.user_id.0).unwrap();

    assert_eq!(first, second);
    assert_eq!(row_after_first.status, row_after_second.status);
    assert_eq!(
        row_after_first.subscription_tier,
        row_after_second.subscription_tier
    );
    assert_eq!(
        row_after_first.current_period_end,
        row_after_second.current_period_end
    );
    assert_eq!(
        row_after_first.stripe_subscription_id,
        row_after_second.stripe_subscription_id
    );
}

#[tokio::test]
async fn test_profile_write_failure_is_non_fatal() {
    let fx = fixture("tolerant@example.com", "free");
    let now = Utc::now();

    fx.provider.with_customer(&fx.email, "cus_1");
    fx.provider.with_subscriptions(
        "cus_1",
        vec![provider_sub(
            "sub_1",
            "active",
            now,
            now + Duration::days(30),
            Some("pro"),
        )],
    );

    fx.profiles.fail_tier_writes();

    // The subscriber write landed, so the call still succeeds
    let ent = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();
    assert!(ent.subscribed);
    assert_eq!(ent.subscription_tier, Some(Tier::Pro));

    let row = fx.subscribers.row_for(fx.user_id.0).unwrap();
    assert_eq!(row.subscription_tier.as_deref(), Some("pro"));

    // Profile tier stays stale until a later reconciliation succeeds
    let profile = fx.profiles.find_by_id(fx.user_id.0).await.unwrap().unwrap();
    assert_eq!(profile.subscription_tier, "free");
}

#[tokio::test]
async fn test_guarded_write_miss_falls_back_to_upsert() {
    let fx = fixture("racer@example.com", "free");
    let now = Utc::now();

    fx.provider.with_customer(&fx.email, "cus_1");
    fx.provider.with_subscriptions(
        "cus_1",
        vec![provider_sub(
            "sub_1",
            "active",
            now,
            now + Duration::days(30),
            Some("premium"),
        )],
    );

    // Existing row from a previous reconciliation, plus a concurrent write
    // landing between the read and the guarded update
    fx.subscribers.insert_row(SubscriberRow {
        id: uuid::Uuid::new_v4(),
        user_id: fx.user_id.0,
        stripe_customer_id: Some("cus_1".to_string()),
        stripe_subscription_id: Some("sub_stale".to_string()),
        status: "trialing".to_string(),
        subscription_tier: Some("pro".to_string()),
        current_period_end: Some(now + Duration::days(1)),
        created_at: now - Duration::days(30),
        updated_at: now - Duration::days(30),
    });
    fx.subscribers.force_guard_miss();

    // The race is logged, the unguarded retry still lands this outcome
    let ent = fx.service.reconcile(fx.user_id, &fx.email).await.unwrap();
    assert!(ent.subscribed);

    let row = fx.subscribers.row_for(fx.user_id.0).unwrap();
    assert_eq!(row.stripe_subscription_id.as_deref(), Some("sub_1"));
    assert_eq!(row.status, "active");
}

// ============================================================================
// Checkout and portal
// ============================================================================

#[tokio::test]
async fn test_checkout_returns_hosted_url() {
    let fx = fixture("buyer@example.com", "free");

    let session = fx
        .service
        .create_checkout(
            &fx.email,
            &CheckoutRequest {
                plan_id: "premium".to_string(),
                plan_name: "Premium".to_string(),
                plan_price_in_cents: 1_200,
                success_url: "https://videocut.test/success".to_string(),
                cancel_url: "https://videocut.test/pricing".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(session.url, "https://checkout.test/session/premium");
}

#[tokio::test]
async fn test_checkout_rejects_unknown_and_free_plans() {
    let fx = fixture("buyer@example.com", "free");

    for plan_id in ["free", "enterprise", ""] {
        let err = fx
            .service
            .create_checkout(
                &fx.email,
                &CheckoutRequest {
                    plan_id: plan_id.to_string(),
                    plan_name: "Whatever".to_string(),
                    plan_price_in_cents: 999,
                    success_url: "https://videocut.test/success".to_string(),
                    cancel_url: "https://videocut.test/pricing".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::InvalidPlan(_)), "{plan_id}");
    }
}

#[tokio::test]
async fn test_portal_requires_existing_customer() {
    let fx = fixture("newbie@example.com", "free");

    let err = fx
        .service
        .create_portal(&fx.email, "https://videocut.test/settings")
        .await
        .unwrap_err();
    assert!(matches!(err, BillingError::CustomerNotFound));

    fx.provider.with_customer(&fx.email, "cus_42");
    let portal = fx
        .service
        .create_portal(&fx.email, "https://videocut.test/settings")
        .await
        .unwrap();
    assert_eq!(portal.url, "https://portal.test/cus_42");
}
