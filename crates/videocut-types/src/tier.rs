//! Subscription tier types

use serde::{Deserialize, Serialize};

/// Subscription tier levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Free tier - 3 portfolio videos, basic profile
    Free,
    /// Premium tier - $12/mo, 25 videos, analytics
    Premium,
    /// Pro tier - $29/mo, unlimited videos, analytics, priority placement
    Pro,
}

impl Tier {
    /// Get the monthly price in cents
    pub const fn price_cents(&self) -> u32 {
        match self {
            Self::Free => 0,
            Self::Premium => 1_200,
            Self::Pro => 2_900,
        }
    }

    /// Maximum number of portfolio videos, `None` for unlimited
    pub const fn video_limit(&self) -> Option<u32> {
        match self {
            Self::Free => Some(3),
            Self::Premium => Some(25),
            Self::Pro => None,
        }
    }

    /// Get features available for this tier
    pub const fn features(&self) -> &'static [&'static str] {
        match self {
            Self::Free => &["portfolio", "messaging"],
            Self::Premium => &["portfolio", "messaging", "analytics", "custom_thumbnails"],
            Self::Pro => &[
                "portfolio",
                "messaging",
                "analytics",
                "custom_thumbnails",
                "priority_placement",
                "client_reviews",
            ],
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Premium => write!(f, "premium"),
            Self::Pro => write!(f, "pro"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            "pro" => Ok(Self::Pro),
            _ => Err(TierParseError(s.to_string())),
        }
    }
}

/// Error parsing a tier string
#[derive(Debug, Clone)]
pub struct TierParseError(pub String);

impl std::fmt::Display for TierParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tier: {}", self.0)
    }
}

impl std::error::Error for TierParseError {}
