//! User and profile types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Tier;

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a new random user ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// User role on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Video editor publishing a portfolio
    Editor,
    /// Client discovering and contacting editors
    Client,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Editor => write!(f, "editor"),
            Self::Client => write!(f, "client"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "editor" => Ok(Self::Editor),
            "client" => Ok(Self::Client),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

/// Error parsing a role string
#[derive(Debug, Clone)]
pub struct RoleParseError(pub String);

impl std::fmt::Display for RoleParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for RoleParseError {}

/// User profile
///
/// `subscription_tier` is written only by the subscription reconciler;
/// the remaining mutable fields are owned by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// User ID
    pub id: UserId,
    /// Display name
    pub display_name: String,
    /// Account email
    pub email: String,
    /// Avatar URL (if set)
    pub avatar_url: Option<String>,
    /// Free-text bio
    pub bio: Option<String>,
    /// Current subscription tier
    pub subscription_tier: Tier,
    /// Cumulative like count across the portfolio
    pub likes_count: i64,
    /// Platform role
    pub role: Role,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
}
