//! Plan catalog
//!
//! Plans are a static, hard-coded catalog. They are never stored per-user;
//! entitlement state lives on the profile and the subscriber record.

use serde::Serialize;

use crate::Tier;

/// A plan in the pricing catalog
///
/// Serialize-only: the catalog is a compile-time constant, never parsed.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    /// Tier this plan grants
    pub id: Tier,
    /// Display name
    pub name: &'static str,
    /// Monthly price in cents
    pub price_cents: u32,
    /// Feature descriptions shown on the pricing page
    pub features: &'static [&'static str],
    /// Whether this plan is highlighted as most popular
    pub popular: bool,
}

/// The full plan catalog, ordered cheapest first
pub const PLANS: &[Plan] = &[
    Plan {
        id: Tier::Free,
        name: "Free",
        price_cents: 0,
        features: &[
            "Up to 3 portfolio videos",
            "Public editor profile",
            "Direct client messaging",
        ],
        popular: false,
    },
    Plan {
        id: Tier::Premium,
        name: "Premium",
        price_cents: 1_200,
        features: &[
            "Up to 25 portfolio videos",
            "Portfolio analytics",
            "Custom thumbnails",
            "Everything in Free",
        ],
        popular: true,
    },
    Plan {
        id: Tier::Pro,
        name: "Pro",
        price_cents: 2_900,
        features: &[
            "Unlimited portfolio videos",
            "Priority search placement",
            "Client reviews",
            "Everything in Premium",
        ],
        popular: false,
    },
];

impl Plan {
    /// Look up a plan by tier
    pub fn for_tier(tier: Tier) -> &'static Plan {
        PLANS
            .iter()
            .find(|p| p.id == tier)
            .expect("catalog covers every tier")
    }
}
