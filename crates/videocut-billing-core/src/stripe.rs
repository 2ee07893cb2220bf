//! Stripe payment provider implementation

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use videocut_types::{
    CheckoutRequest, CheckoutSession, CustomerId, PortalSession, ProviderSubscriptionId,
};

use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::provider::{PaymentProvider, ProviderCustomer, ProviderSubscription};

/// Price metadata key carrying the canonical plan id
const PLAN_ID_METADATA_KEY: &str = "plan_id";

/// Stripe payment provider
#[derive(Clone)]
pub struct StripeProvider {
    client: Client,
    config: BillingConfig,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: BillingConfig) -> Self {
        let client = Client::new();
        Self { client, config }
    }

    /// Make authenticated request to Stripe
    async fn stripe_request<T: for<'de> Deserialize<'de>>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        form: Option<&[(&str, &str)]>,
    ) -> Result<T, BillingError> {
        let url = format!("{}{endpoint}", self.config.api_base);

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.config.stripe_secret_key, Option::<&str>::None);

        if let Some(form_data) = form {
            request = request.form(form_data);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Stripe API request failed");
            BillingError::ProviderError(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Stripe API error");
            return Err(BillingError::ProviderError(format!(
                "Stripe API error: {status}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Stripe response");
            BillingError::Internal(e.to_string())
        })
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[instrument(skip(self))]
    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ProviderCustomer>, BillingError> {
        debug!(email = %email, "Looking up Stripe customer by email");

        let form = [("email", email), ("limit", "1")];
        let customers: StripeList<StripeCustomer> = self
            .stripe_request(reqwest::Method::GET, "/customers", Some(&form))
            .await?;

        Ok(customers
            .data
            .into_iter()
            .find(|c| !c.deleted)
            .map(|c| ProviderCustomer {
                id: CustomerId::new(c.id),
                email: c.email.unwrap_or_default(),
            }))
    }

    #[instrument(skip(self))]
    async fn list_subscriptions(
        &self,
        customer_id: &CustomerId,
        limit: u32,
    ) -> Result<Vec<ProviderSubscription>, BillingError> {
        debug!(customer_id = %customer_id, limit = %limit, "Listing Stripe subscriptions");

        let limit_str = limit.to_string();
        let form = [
            ("customer", customer_id.0.as_str()),
            ("status", "all"),
            ("limit", &limit_str),
            ("expand[]", "data.items.data.price"),
        ];

        let subs: StripeList<StripeSubscription> = self
            .stripe_request(reqwest::Method::GET, "/subscriptions", Some(&form))
            .await?;

        subs.data.into_iter().map(TryInto::try_into).collect()
    }

    #[instrument(skip(self, request))]
    async fn create_checkout_session(
        &self,
        customer_id: Option<&CustomerId>,
        customer_email: &str,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BillingError> {
        debug!(plan_id = %request.plan_id, "Creating Stripe checkout session");

        let price_str = request.plan_price_in_cents.to_string();
        let mut form: Vec<(&str, &str)> = vec![
            ("mode", "subscription"),
            ("success_url", &request.success_url),
            ("cancel_url", &request.cancel_url),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", "usd"),
            ("line_items[0][price_data][unit_amount]", &price_str),
            ("line_items[0][price_data][recurring][interval]", "month"),
            (
                "line_items[0][price_data][product_data][name]",
                &request.plan_name,
            ),
            (
                "line_items[0][price_data][product_data][metadata][plan_id]",
                &request.plan_id,
            ),
            ("subscription_data[metadata][plan_id]", &request.plan_id),
        ];

        // Reuse the existing customer when known; otherwise checkout
        // creates one keyed to the email.
        match customer_id {
            Some(id) => form.push(("customer", id.0.as_str())),
            None => form.push(("customer_email", customer_email)),
        }

        let session: StripeCheckoutSession = self
            .stripe_request(reqwest::Method::POST, "/checkout/sessions", Some(&form))
            .await?;

        let url = session.url.ok_or_else(|| {
            BillingError::ProviderError("checkout session has no URL".to_string())
        })?;

        Ok(CheckoutSession { url })
    }

    #[instrument(skip(self))]
    async fn create_portal_session(
        &self,
        customer_id: &CustomerId,
        return_url: &str,
    ) -> Result<PortalSession, BillingError> {
        debug!(customer_id = %customer_id, "Creating Stripe portal session");

        let form = [
            ("customer", customer_id.0.as_str()),
            ("return_url", return_url),
        ];

        let session: StripeBillingPortalSession = self
            .stripe_request(
                reqwest::Method::POST,
                "/billing_portal/sessions",
                Some(&form),
            )
            .await?;

        Ok(PortalSession { url: session.url })
    }
}

// Stripe API response types

/// Stripe customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeCustomer {
    /// Customer ID
    pub id: String,
    /// Customer email
    pub email: Option<String>,
    /// Whether the customer is deleted
    #[serde(default)]
    pub deleted: bool,
}

/// Stripe subscription with expanded price detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeSubscription {
    /// Subscription ID
    pub id: String,
    /// Customer ID
    pub customer: String,
    /// Subscription status
    pub status: String,
    /// Creation time (Unix timestamp)
    pub created: i64,
    /// Current period end (Unix timestamp)
    pub current_period_end: i64,
    /// Whether subscription cancels at period end
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// Subscription items (expanded)
    pub items: StripeList<StripeSubscriptionItem>,
}

/// Stripe subscription item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeSubscriptionItem {
    /// The price attached to this item
    pub price: StripePrice,
}

/// Stripe price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripePrice {
    /// Price ID
    pub id: String,
    /// Amount in cents
    pub unit_amount: Option<i64>,
    /// Price metadata; `plan_id` here is the sole source of the plan
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Stripe checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeCheckoutSession {
    /// Session ID
    pub id: String,
    /// Checkout URL
    pub url: Option<String>,
}

/// Stripe billing portal session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeBillingPortalSession {
    /// Session ID
    pub id: String,
    /// Portal URL
    pub url: String,
}

/// Stripe list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeList<T> {
    /// List data
    pub data: Vec<T>,
    /// Whether there are more items
    #[serde(default)]
    pub has_more: bool,
}

impl TryFrom<StripeSubscription> for ProviderSubscription {
    type Error = BillingError;

    fn try_from(sub: StripeSubscription) -> Result<Self, Self::Error> {
        let created = parse_timestamp(sub.created, &sub.id)?;
        let current_period_end = parse_timestamp(sub.current_period_end, &sub.id)?;

        let plan_id = sub
            .items
            .data
            .first()
            .and_then(|item| item.price.metadata.get(PLAN_ID_METADATA_KEY))
            .cloned();

        Ok(Self {
            id: ProviderSubscriptionId::new(sub.id),
            status: sub.status,
            created,
            current_period_end,
            plan_id,
        })
    }
}

fn parse_timestamp(ts: i64, subscription_id: &str) -> Result<DateTime<Utc>, BillingError> {
    DateTime::<Utc>::from_timestamp(ts, 0).ok_or_else(|| {
        BillingError::ProviderError(format!(
            "invalid timestamp {ts} on subscription {subscription_id}"
        ))
    })
}
