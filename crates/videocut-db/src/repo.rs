//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// Profile repository trait
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a profile by user ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProfileRow>>;

    /// Find a profile by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<ProfileRow>>;

    /// Create a new profile
    async fn create(&self, profile: CreateProfile) -> DbResult<ProfileRow>;

    /// Update the owner-mutable fields (name, bio, avatar)
    async fn update_details(&self, id: Uuid, details: UpdateProfile) -> DbResult<ProfileRow>;

    /// Update the subscription tier (reconciler only)
    async fn update_tier(&self, id: Uuid, tier: &str) -> DbResult<()>;
}

/// Create profile input
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: String,
}

/// Owner-mutable profile fields; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Subscriber repository trait
///
/// Writes carry an optimistic guard on `updated_at` so concurrent
/// reconciliations (two browser tabs) are detected rather than silently
/// overwriting each other.
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Find the subscriber record for a user
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Option<SubscriberRow>>;

    /// Insert or overwrite the subscriber record for a user
    async fn upsert(&self, sub: UpsertSubscriber) -> DbResult<SubscriberRow>;

    /// Update the record only if `updated_at` still matches.
    ///
    /// Returns false when the guard missed (a concurrent write landed
    /// first); the caller decides whether to retry unguarded.
    async fn update_guarded(
        &self,
        sub: UpsertSubscriber,
        expected_updated_at: DateTime<Utc>,
    ) -> DbResult<bool>;

    /// Mark any existing record inactive, clearing tier and period end.
    ///
    /// Does nothing when the user has no record yet.
    async fn mark_inactive(&self, user_id: Uuid) -> DbResult<()>;
}

/// Subscriber upsert input
#[derive(Debug, Clone)]
pub struct UpsertSubscriber {
    pub user_id: Uuid,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub status: String,
    pub subscription_tier: Option<String>,
    pub current_period_end: Option<DateTime<Utc>>,
}

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by token hash
    async fn find_by_token_hash(&self, token_hash: &str) -> DbResult<Option<SessionRow>>;

    /// Create a new session
    async fn create(&self, session: CreateSession) -> DbResult<SessionRow>;

    /// Revoke a session
    async fn revoke(&self, id: Uuid) -> DbResult<()>;

    /// Delete expired sessions
    async fn delete_expired(&self) -> DbResult<u64>;
}

/// Create session input
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
