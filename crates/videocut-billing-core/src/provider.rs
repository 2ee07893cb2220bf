//! Payment provider abstraction

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use videocut_types::{
    CheckoutRequest, CheckoutSession, CustomerId, PortalSession, ProviderSubscriptionId,
};

use crate::BillingError;

/// Provider-side customer
#[derive(Debug, Clone)]
pub struct ProviderCustomer {
    /// Customer ID at the payment provider
    pub id: CustomerId,
    /// Customer email
    pub email: String,
}

/// Provider-side view of a subscription
///
/// `status` keeps the provider's raw status string; the reconciler only
/// acts on the states it recognizes and treats everything else as
/// non-qualifying.
#[derive(Debug, Clone)]
pub struct ProviderSubscription {
    /// Subscription ID at the payment provider
    pub id: ProviderSubscriptionId,
    /// Raw provider status (active, trialing, past_due, canceled, ...)
    pub status: String,
    /// When the subscription was created
    pub created: DateTime<Utc>,
    /// End of the current billing period
    pub current_period_end: DateTime<Utc>,
    /// Plan id from the price metadata, when present
    pub plan_id: Option<String>,
}

/// Payment provider trait
///
/// Abstracts payment processing to allow different providers (Stripe, etc.)
/// and scripted providers in tests.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Look up the provider customer for an email, if one exists
    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ProviderCustomer>, BillingError>;

    /// List a customer's subscriptions across all statuses, newest first,
    /// with pricing detail populated
    async fn list_subscriptions(
        &self,
        customer_id: &CustomerId,
        limit: u32,
    ) -> Result<Vec<ProviderSubscription>, BillingError>;

    /// Create a hosted checkout session for the requested plan.
    ///
    /// When `customer_id` is `None` the provider creates the customer as
    /// part of checkout, keyed to `customer_email`.
    async fn create_checkout_session(
        &self,
        customer_id: Option<&CustomerId>,
        customer_email: &str,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BillingError>;

    /// Create a self-service customer portal session
    async fn create_portal_session(
        &self,
        customer_id: &CustomerId,
        return_url: &str,
    ) -> Result<PortalSession, BillingError>;
}
