//! Billing API client

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use videocut_types::{
    CheckoutRequest, CheckoutSession, Entitlement, PortalRequest, PortalSession, Profile, Tier,
};

use crate::{ClientConfig, ClientError, Result};

/// A plan as served by the billing API's catalog endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PlanInfo {
    /// Tier this plan grants
    pub id: Tier,
    /// Display name
    pub name: String,
    /// Monthly price in cents
    pub price_cents: u32,
    /// Feature descriptions shown on the pricing page
    pub features: Vec<String>,
    /// Whether this plan is highlighted as most popular
    pub popular: bool,
}

/// Billing API client
///
/// Thin wrapper over the billing API's HTTP surface. Cheap to clone; the
/// underlying connection pool is shared.
#[derive(Clone)]
pub struct BillingClient {
    client: Client,
    config: ClientConfig,
}

impl BillingClient {
    /// Create a new billing client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{path}", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.auth_token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.auth_token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response(status.as_u16(), &body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Create a hosted checkout session for a paid plan
    #[instrument(skip(self, request), fields(plan_id = %request.plan_id))]
    pub async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        debug!("Requesting checkout session");
        self.post("/functions/create-checkout", request).await
    }

    /// Create a customer portal session for managing the subscription
    #[instrument(skip(self))]
    pub async fn customer_portal(&self, return_url: &str) -> Result<PortalSession> {
        debug!("Requesting portal session");
        self.post(
            "/functions/customer-portal",
            &PortalRequest {
                return_url: return_url.to_string(),
            },
        )
        .await
    }

    /// Re-derive the caller's entitlement from the payment provider
    #[instrument(skip(self))]
    pub async fn check_subscription(&self) -> Result<Entitlement> {
        debug!("Checking subscription");
        self.post("/functions/check-subscription", &serde_json::json!({}))
            .await
    }

    /// Fetch the caller's profile
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<Profile> {
        self.get("/api/v1/profile").await
    }

    /// Fetch the plan catalog
    #[instrument(skip(self))]
    pub async fn list_plans(&self) -> Result<Vec<PlanInfo>> {
        self.get("/api/v1/plans").await
    }
}

impl std::fmt::Debug for BillingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
