//! Application state for the Billing API service.

use std::sync::Arc;

use videocut_billing_core::{BillingService, StripeProvider};
use videocut_db::pg::{PgProfileRepository, PgSubscriberRepository, Repositories};
use videocut_db::DbPool;

use crate::config::Config;

/// Billing service wired to Stripe and Postgres
pub type Billing = BillingService<StripeProvider, PgProfileRepository, PgSubscriberRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Billing service (checkout, portal, reconciliation)
    pub billing: Arc<Billing>,
    /// Database repositories
    pub repos: Repositories,
    /// Database pool (readiness probe)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(repos: Repositories, pool: DbPool, config: Config) -> Self {
        let provider = StripeProvider::new(config.billing.clone());
        let billing = BillingService::new(
            provider,
            Arc::new(repos.profiles.clone()),
            Arc::new(repos.subscribers.clone()),
        );

        Self {
            billing: Arc::new(billing),
            repos,
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
