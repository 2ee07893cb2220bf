//! Billing errors

use thiserror::Error;

/// Billing errors
#[derive(Error, Debug)]
pub enum BillingError {
    /// Caller has no valid session
    #[error("user not authenticated or email unavailable")]
    Unauthenticated,

    /// No payment customer exists for the user (portal requires one)
    #[error("customer not found")]
    CustomerNotFound,

    /// Checkout requested for a plan that is not purchasable
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// Selected subscription's price carries no plan_id metadata
    #[error("missing plan_id metadata on subscription {subscription_id}")]
    MissingPlanMetadata {
        /// Provider subscription id
        subscription_id: String,
    },

    /// Payment provider error
    #[error("provider error: {0}")]
    ProviderError(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] videocut_db::DbError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Check if this is a provider-side error
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::ProviderError(_))
    }
}
