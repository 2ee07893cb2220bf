//! Billing and payment types

use serde::{Deserialize, Serialize};

/// Stripe customer ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

impl CustomerId {
    /// Create a new customer ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stripe subscription ID (the provider's id, not a local row id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderSubscriptionId(pub String);

impl ProviderSubscriptionId {
    /// Create a new provider subscription ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ProviderSubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Checkout session request, as sent by the client's pricing page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Plan being purchased (canonical id, e.g. "premium")
    pub plan_id: String,
    /// Plan display name shown on the hosted checkout page
    pub plan_name: String,
    /// Monthly price in minor currency units
    pub plan_price_in_cents: u32,
    /// Redirect URL after successful payment
    pub success_url: String,
    /// Redirect URL when the user abandons checkout
    pub cancel_url: String,
}

/// Checkout session response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Hosted checkout URL to redirect the browser to
    pub url: String,
}

/// Customer portal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalRequest {
    /// Redirect URL after the user leaves the portal
    pub return_url: String,
}

/// Customer portal session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSession {
    /// Hosted portal URL to redirect the browser to
    pub url: String,
}
