//! VideoCut Billing Core - Billing business logic
//!
//! Core billing functionality: Stripe integration, checkout and customer
//! portal session creation, and subscription entitlement reconciliation.
//!
//! # Example
//!
//! ```rust,ignore
//! use videocut_billing_core::{BillingConfig, BillingService, StripeProvider};
//!
//! let provider = StripeProvider::new(BillingConfig::new("sk_test_..."));
//! let billing = BillingService::new(provider, profiles, subscribers);
//!
//! // Re-derive entitlement from the payment provider and persist it
//! let entitlement = billing.reconcile(user_id, "editor@example.com").await?;
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod service;
pub mod stripe;

pub use config::BillingConfig;
pub use error::BillingError;
pub use provider::{PaymentProvider, ProviderCustomer, ProviderSubscription};
pub use service::{is_effectively_subscribed, select_subscription, BillingService};
pub use stripe::StripeProvider;
