//! Entitlement types
//!
//! An entitlement is the derived `{subscribed, tier, status, period_end}`
//! tuple describing what a user is currently allowed to access. It is
//! produced only by the subscription reconciler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{SubscriptionStatus, Tier};

/// Derived entitlement state for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Whether the user is effectively subscribed
    pub subscribed: bool,
    /// Paid tier the subscription grants (None when not subscribed)
    pub subscription_tier: Option<Tier>,
    /// End of the current billing period (None when not subscribed)
    pub current_period_end: Option<DateTime<Utc>>,
    /// Provider-side subscription status
    pub status: SubscriptionStatus,
}

impl Entitlement {
    /// The entitlement of a user with no qualifying subscription
    pub const fn inactive() -> Self {
        Self {
            subscribed: false,
            subscription_tier: None,
            current_period_end: None,
            status: SubscriptionStatus::Inactive,
        }
    }

    /// Tier the profile should carry for this entitlement
    pub fn effective_tier(&self) -> Tier {
        if self.subscribed {
            self.subscription_tier.unwrap_or(Tier::Free)
        } else {
            Tier::Free
        }
    }
}
