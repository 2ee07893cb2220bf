//! Client configuration

use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Billing API base URL
    pub base_url: String,
    /// Bearer token presented on every request
    pub auth_token: String,
    /// Per-request timeout.
    /// Default: 30 seconds
    pub timeout: Duration,
    /// How long a fetched entitlement stays fresh before a session
    /// considers it stale.
    /// Default: 60 seconds
    pub entitlement_ttl: Duration,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: auth_token.into(),
            timeout: Duration::from_secs(30),
            entitlement_ttl: Duration::from_secs(60),
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the entitlement freshness window.
    #[must_use]
    pub fn with_entitlement_ttl(mut self, ttl: Duration) -> Self {
        self.entitlement_ttl = ttl;
        self
    }
}
