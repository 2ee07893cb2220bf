//! Billing service
//!
//! Hosts the subscription reconciler plus checkout and portal session
//! creation. The reconciler never trusts client-supplied plan data: it
//! re-derives entitlement from the payment provider's view and persists it
//! to the subscriber record and the profile tier.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use videocut_db::{ProfileRepository, SubscriberRepository, UpsertSubscriber};
use videocut_types::{
    CheckoutRequest, CheckoutSession, Entitlement, PortalSession, SubscriptionStatus, Tier, UserId,
};

use crate::provider::{PaymentProvider, ProviderSubscription};
use crate::BillingError;

/// How many subscriptions to pull from the provider per reconciliation
const SUBSCRIPTION_FETCH_LIMIT: u32 = 10;

/// Billing service
pub struct BillingService<P, R, S> {
    provider: P,
    profiles: Arc<R>,
    subscribers: Arc<S>,
}

impl<P, R, S> BillingService<P, R, S>
where
    P: PaymentProvider,
    R: ProfileRepository,
    S: SubscriberRepository,
{
    /// Create a new billing service
    pub fn new(provider: P, profiles: Arc<R>, subscribers: Arc<S>) -> Self {
        Self {
            provider,
            profiles,
            subscribers,
        }
    }

    /// Create a hosted checkout session for a plan.
    ///
    /// Performs no writes and no optimistic updates; the provider's hosted
    /// page owns the checkout lifecycle from here.
    #[instrument(skip(self, request), fields(plan_id = %request.plan_id))]
    pub async fn create_checkout(
        &self,
        email: &str,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BillingError> {
        let tier: Tier = request
            .plan_id
            .parse()
            .map_err(|_| BillingError::InvalidPlan(request.plan_id.clone()))?;
        if tier == Tier::Free {
            return Err(BillingError::InvalidPlan(request.plan_id.clone()));
        }

        let customer = self.provider.find_customer_by_email(email).await?;
        let session = self
            .provider
            .create_checkout_session(customer.as_ref().map(|c| &c.id), email, request)
            .await?;

        info!(plan_id = %request.plan_id, "Checkout session created");
        Ok(session)
    }

    /// Create a self-service customer portal session.
    ///
    /// Fails when no provider customer exists for the caller yet.
    #[instrument(skip(self))]
    pub async fn create_portal(
        &self,
        email: &str,
        return_url: &str,
    ) -> Result<PortalSession, BillingError> {
        let customer = self
            .provider
            .find_customer_by_email(email)
            .await?
            .ok_or(BillingError::CustomerNotFound)?;

        self.provider
            .create_portal_session(&customer.id, return_url)
            .await
    }

    /// Reconcile the user's entitlement against the payment provider.
    ///
    /// Queries the provider for the ground-truth subscription state, writes
    /// the derived entitlement to the subscriber record and the profile
    /// tier, and returns it. The two writes are not transactional: a
    /// profile-tier write failure after a successful subscriber write is
    /// logged and the call still succeeds on the subscriber outcome.
    #[instrument(skip(self, email), fields(user_id = %user_id))]
    pub async fn reconcile(
        &self,
        user_id: UserId,
        email: &str,
    ) -> Result<Entitlement, BillingError> {
        debug!(step = "find_customer", "Reconciling subscription");

        let Some(customer) = self.provider.find_customer_by_email(email).await? else {
            debug!(step = "no_customer", "No payment customer for user");
            return self.persist_inactive(user_id).await;
        };

        debug!(step = "list_subscriptions", customer_id = %customer.id, "Customer found");
        let subscriptions = self
            .provider
            .list_subscriptions(&customer.id, SUBSCRIPTION_FETCH_LIMIT)
            .await?;

        let now = Utc::now();
        let Some(selected) = select_subscription(&subscriptions, now) else {
            debug!(step = "no_qualifying_subscription", "No subscription qualifies");
            return self.persist_inactive(user_id).await;
        };

        // The price metadata plan_id is the sole source of truth for the
        // plan; product and price names are never parsed.
        let plan_id = selected
            .plan_id
            .as_deref()
            .ok_or_else(|| BillingError::MissingPlanMetadata {
                subscription_id: selected.id.to_string(),
            })?;
        let tier: Tier = plan_id
            .parse()
            .map_err(|_| BillingError::InvalidPlan(plan_id.to_string()))?;

        let status: SubscriptionStatus = selected
            .status
            .parse()
            .unwrap_or(SubscriptionStatus::Inactive);
        let subscribed =
            is_effectively_subscribed(&selected.status, selected.current_period_end, now);

        debug!(
            step = "persist",
            subscription_id = %selected.id,
            status = %status,
            tier = %tier,
            subscribed,
            "Subscription selected"
        );

        self.write_subscriber(UpsertSubscriber {
            user_id: user_id.0,
            stripe_customer_id: Some(customer.id.to_string()),
            stripe_subscription_id: Some(selected.id.to_string()),
            status: selected.status.clone(),
            subscription_tier: Some(tier.to_string()),
            current_period_end: Some(selected.current_period_end),
        })
        .await?;

        let effective_tier = if subscribed { tier } else { Tier::Free };
        self.write_profile_tier(user_id, effective_tier).await;

        Ok(Entitlement {
            subscribed,
            subscription_tier: Some(tier),
            current_period_end: Some(selected.current_period_end),
            status,
        })
    }

    /// Persist the "no qualifying subscription" outcome: subscriber record
    /// marked inactive with tier/period cleared, profile tier back to free.
    async fn persist_inactive(&self, user_id: UserId) -> Result<Entitlement, BillingError> {
        self.subscribers.mark_inactive(user_id.0).await?;
        self.write_profile_tier(user_id, Tier::Free).await;
        Ok(Entitlement::inactive())
    }

    /// Write the subscriber record with an optimistic guard on updated_at.
    ///
    /// A guard miss means a concurrent reconciliation wrote first; the race
    /// is logged and the write retried unguarded (last write wins, but
    /// observed rather than silent).
    async fn write_subscriber(&self, record: UpsertSubscriber) -> Result<(), BillingError> {
        if let Some(existing) = self.subscribers.find_by_user_id(record.user_id).await? {
            if self
                .subscribers
                .update_guarded(record.clone(), existing.updated_at)
                .await?
            {
                return Ok(());
            }
            warn!(
                user_id = %record.user_id,
                step = "subscriber_write",
                "Concurrent subscriber update detected; overwriting"
            );
        }

        self.subscribers.upsert(record).await?;
        Ok(())
    }

    /// Write the profile tier; failures are non-fatal by design of the
    /// reconciliation flow (the subscriber record already holds the result).
    async fn write_profile_tier(&self, user_id: UserId, tier: Tier) {
        if let Err(e) = self.profiles.update_tier(user_id.0, &tier.to_string()).await {
            warn!(
                user_id = %user_id,
                tier = %tier,
                error = %e,
                step = "profile_tier_write",
                "Profile tier write failed; returning subscriber outcome anyway"
            );
        }
    }
}

impl<P, R, S> std::fmt::Debug for BillingService<P, R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingService").finish_non_exhaustive()
    }
}

/// Select the subscription a reconciliation acts on.
///
/// Precedence: first `active`, else first `trialing`, else the most
/// recently created subscription — adopted only while `past_due`, or
/// `canceled` with a period end still in the future (grace period).
pub fn select_subscription(
    subscriptions: &[ProviderSubscription],
    now: DateTime<Utc>,
) -> Option<&ProviderSubscription> {
    if let Some(sub) = subscriptions.iter().find(|s| s.status == "active") {
        return Some(sub);
    }
    if let Some(sub) = subscriptions.iter().find(|s| s.status == "trialing") {
        return Some(sub);
    }

    let latest = subscriptions.iter().max_by_key(|s| s.created)?;
    match latest.status.as_str() {
        "past_due" => Some(latest),
        "canceled" if latest.current_period_end > now => Some(latest),
        _ => None,
    }
}

/// Whether a subscription status grants access right now
pub fn is_effectively_subscribed(
    status: &str,
    current_period_end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    matches!(status, "active" | "trialing" | "past_due")
        || (status == "canceled" && current_period_end > now)
}
