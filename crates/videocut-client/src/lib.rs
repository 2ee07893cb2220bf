//! VideoCut Client - SDK for billing API consumers
//!
//! HTTP client for the VideoCut billing API plus an explicit entitlement
//! session that tracks when the entitlement was last fetched and refreshes
//! it on demand.

pub mod billing;
pub mod config;
pub mod error;
pub mod session;

pub use billing::{BillingClient, PlanInfo};
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{EntitlementSession, SessionSnapshot};

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;
