//! Shared test fixtures: scripted payment provider and in-memory repositories

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use videocut_billing_core::{BillingError, PaymentProvider, ProviderCustomer, ProviderSubscription};
use videocut_db::{
    CreateProfile, DbError, DbResult, ProfileRepository, ProfileRow, SubscriberRepository,
    SubscriberRow, UpdateProfile, UpsertSubscriber,
};
use videocut_types::{
    CheckoutRequest, CheckoutSession, CustomerId, PortalSession, ProviderSubscriptionId,
};

// ============================================================================
// Scripted payment provider
// ============================================================================

/// Payment provider scripted from test data
#[derive(Default, Clone)]
pub struct ScriptedProvider {
    customers: Arc<DashMap<String, ProviderCustomer>>,
    subscriptions: Arc<DashMap<String, Vec<ProviderSubscription>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a customer for an email
    pub fn with_customer(&self, email: &str, customer_id: &str) -> &Self {
        self.customers.insert(
            email.to_string(),
            ProviderCustomer {
                id: CustomerId::new(customer_id),
                email: email.to_string(),
            },
        );
        self
    }

    /// Script the subscriptions returned for a customer
    pub fn with_subscriptions(&self, customer_id: &str, subs: Vec<ProviderSubscription>) -> &Self {
        self.subscriptions.insert(customer_id.to_string(), subs);
        self
    }
}

#[async_trait]
impl PaymentProvider for ScriptedProvider {
    async fn find_customer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ProviderCustomer>, BillingError> {
        Ok(self.customers.get(email).map(|c| c.value().clone()))
    }

    async fn list_subscriptions(
        &self,
        customer_id: &CustomerId,
        limit: u32,
    ) -> Result<Vec<ProviderSubscription>, BillingError> {
        let subs = self
            .subscriptions
            .get(&customer_id.0)
            .map(|s| s.value().clone())
            .unwrap_or_default();
        Ok(subs.into_iter().take(limit as usize).collect())
    }

    async fn create_checkout_session(
        &self,
        _customer_id: Option<&CustomerId>,
        _customer_email: &str,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BillingError> {
        Ok(CheckoutSession {
            url: format!("https://checkout.test/session/{}", request.plan_id),
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &CustomerId,
        _return_url: &str,
    ) -> Result<PortalSession, BillingError> {
        Ok(PortalSession {
            url: format!("https://portal.test/{customer_id}"),
        })
    }
}

/// Build a provider subscription for scripting
pub fn provider_sub(
    id: &str,
    status: &str,
    created: DateTime<Utc>,
    period_end: DateTime<Utc>,
    plan_id: Option<&str>,
) -> ProviderSubscription {
    ProviderSubscription {
        id: ProviderSubscriptionId::new(id),
        status: status.to_string(),
        created,
        current_period_end: period_end,
        plan_id: plan_id.map(str::to_string),
    }
}

// ============================================================================
// In-memory repositories
// ============================================================================

/// In-memory profile repository for testing
#[derive(Default, Clone)]
pub struct MockProfileRepository {
    profiles: Arc<DashMap<Uuid, ProfileRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
    /// When set, update_tier fails (exercises the non-fatal write path)
    fail_tier_writes: Arc<AtomicBool>,
}

impl MockProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a test profile directly
    pub fn insert_profile(&self, profile: ProfileRow) {
        self.by_email.insert(profile.email.clone(), profile.id);
        self.profiles.insert(profile.id, profile);
    }

    /// Build a test profile with the given tier
    pub fn test_profile(email: &str, tier: &str) -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            display_name: "Test Editor".to_string(),
            email: email.to_string(),
            avatar_url: None,
            bio: None,
            subscription_tier: tier.to_string(),
            likes_count: 0,
            role: "editor".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Make every subsequent update_tier call fail
    pub fn fail_tier_writes(&self) {
        self.fail_tier_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProfileRow>> {
        Ok(self.profiles.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<ProfileRow>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.profiles.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, profile: CreateProfile) -> DbResult<ProfileRow> {
        let row = ProfileRow {
            id: profile.id,
            display_name: profile.display_name,
            email: profile.email,
            avatar_url: None,
            bio: None,
            subscription_tier: "free".to_string(),
            likes_count: 0,
            role: profile.role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.insert_profile(row.clone());
        Ok(row)
    }

    async fn update_details(&self, id: Uuid, details: UpdateProfile) -> DbResult<ProfileRow> {
        let mut profile = self.profiles.get_mut(&id).ok_or(DbError::NotFound)?;
        if let Some(name) = details.display_name {
            profile.display_name = name;
        }
        if let Some(bio) = details.bio {
            profile.bio = Some(bio);
        }
        if let Some(avatar) = details.avatar_url {
            profile.avatar_url = Some(avatar);
        }
        profile.updated_at = Utc::now();
        Ok(profile.value().clone())
    }

    async fn update_tier(&self, id: Uuid, tier: &str) -> DbResult<()> {
        if self.fail_tier_writes.load(Ordering::SeqCst) {
            return Err(DbError::NotFound);
        }
        if let Some(mut profile) = self.profiles.get_mut(&id) {
            profile.subscription_tier = tier.to_string();
            profile.updated_at = Utc::now();
        }
        Ok(())
    }
}

/// In-memory subscriber repository for testing
#[derive(Default, Clone)]
pub struct MockSubscriberRepository {
    subscribers: Arc<DashMap<Uuid, SubscriberRow>>,
    /// When set, guarded updates always miss (simulates a concurrent write
    /// landing between the read and the guarded update)
    force_guard_miss: Arc<AtomicBool>,
}

impl MockSubscriberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current row for assertions
    pub fn row_for(&self, user_id: Uuid) -> Option<SubscriberRow> {
        self.subscribers.get(&user_id).map(|r| r.value().clone())
    }

    /// Insert a row directly
    pub fn insert_row(&self, row: SubscriberRow) {
        self.subscribers.insert(row.user_id, row);
    }

    /// Make every subsequent guarded update miss
    pub fn force_guard_miss(&self) {
        self.force_guard_miss.store(true, Ordering::SeqCst);
    }

    fn apply(row: &mut SubscriberRow, sub: &UpsertSubscriber) {
        row.stripe_customer_id = sub.stripe_customer_id.clone();
        row.stripe_subscription_id = sub.stripe_subscription_id.clone();
        row.status = sub.status.clone();
        row.subscription_tier = sub.subscription_tier.clone();
        row.current_period_end = sub.current_period_end;
        row.updated_at = Utc::now();
    }
}

#[async_trait]
impl SubscriberRepository for MockSubscriberRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Option<SubscriberRow>> {
        Ok(self.subscribers.get(&user_id).map(|r| r.value().clone()))
    }

    async fn upsert(&self, sub: UpsertSubscriber) -> DbResult<SubscriberRow> {
        let mut row = self
            .subscribers
            .entry(sub.user_id)
            .or_insert_with(|| SubscriberRow {
                id: Uuid::new_v4(),
                user_id: sub.user_id,
                stripe_customer_id: None,
                stripe_subscription_id: None,
                status: "inactive".to_string(),
                subscription_tier: None,
                current_period_end: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
        Self::apply(&mut row, &sub);
        Ok(row.value().clone())
    }

    async fn update_guarded(
        &self,
        sub: UpsertSubscriber,
        expected_updated_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        if self.force_guard_miss.load(Ordering::SeqCst) {
            return Ok(false);
        }
        match self.subscribers.get_mut(&sub.user_id) {
            Some(mut row) if row.updated_at == expected_updated_at => {
                Self::apply(&mut row, &sub);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_inactive(&self, user_id: Uuid) -> DbResult<()> {
        if let Some(mut row) = self.subscribers.get_mut(&user_id) {
            row.status = "inactive".to_string();
            row.stripe_subscription_id = None;
            row.subscription_tier = None;
            row.current_period_end = None;
            row.updated_at = Utc::now();
        }
        Ok(())
    }
}
