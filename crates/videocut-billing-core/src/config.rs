//! Billing configuration

/// Billing service configuration
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Stripe API base URL (overridable for testing)
    pub api_base: String,
}

impl BillingConfig {
    /// Create a new billing config
    pub fn new(stripe_secret_key: impl Into<String>) -> Self {
        Self {
            stripe_secret_key: stripe_secret_key.into(),
            api_base: "https://api.stripe.com/v1".to_string(),
        }
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}
