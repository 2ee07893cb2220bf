//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use videocut_types::{Profile, Role, Tier, UserId};

/// Profile row from the database
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub subscription_tier: String,
    pub likes_count: i64,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subscriber row from the database
///
/// Audit/cache record of the last reconciliation against the payment
/// provider. Only the reconciler reads or writes it.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriberRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub status: String,
    pub subscription_tier: Option<String>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session row from the database
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl ProfileRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Convert to the domain profile type
    ///
    /// Unknown tier/role strings fall back to the safe defaults rather
    /// than failing the read.
    pub fn to_profile(&self) -> Profile {
        Profile {
            id: UserId(self.id),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
            bio: self.bio.clone(),
            subscription_tier: self.subscription_tier.parse().unwrap_or(Tier::Free),
            likes_count: self.likes_count,
            role: self.role.parse().unwrap_or(Role::Editor),
            created_at: self.created_at,
        }
    }
}

impl SessionRow {
    /// Whether the session is usable right now
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }

    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.user_id)
    }
}
