//! PostgreSQL subscriber repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::SubscriberRow;
use crate::repo::{SubscriberRepository, UpsertSubscriber};

/// PostgreSQL subscriber repository
#[derive(Clone)]
pub struct PgSubscriberRepository {
    pool: PgPool,
}

impl PgSubscriberRepository {
    /// Create a new subscriber repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberRepository for PgSubscriberRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> DbResult<Option<SubscriberRow>> {
        let sub = sqlx::query_as::<_, SubscriberRow>(
            r#"
            SELECT id, user_id, stripe_customer_id, stripe_subscription_id,
                   status, subscription_tier, current_period_end, created_at, updated_at
            FROM subscribers
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sub)
    }

    async fn upsert(&self, sub: UpsertSubscriber) -> DbResult<SubscriberRow> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            INSERT INTO subscribers (id, user_id, stripe_customer_id, stripe_subscription_id,
                                     status, subscription_tier, current_period_end)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE
            SET stripe_customer_id = EXCLUDED.stripe_customer_id,
                stripe_subscription_id = EXCLUDED.stripe_subscription_id,
                status = EXCLUDED.status,
                subscription_tier = EXCLUDED.subscription_tier,
                current_period_end = EXCLUDED.current_period_end,
                updated_at = NOW()
            RETURNING id, user_id, stripe_customer_id, stripe_subscription_id,
                      status, subscription_tier, current_period_end, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sub.user_id)
        .bind(&sub.stripe_customer_id)
        .bind(&sub.stripe_subscription_id)
        .bind(&sub.status)
        .bind(&sub.subscription_tier)
        .bind(sub.current_period_end)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_guarded(
        &self,
        sub: UpsertSubscriber,
        expected_updated_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE subscribers
            SET stripe_customer_id = $1,
                stripe_subscription_id = $2,
                status = $3,
                subscription_tier = $4,
                current_period_end = $5,
                updated_at = NOW()
            WHERE user_id = $6 AND updated_at = $7
            "#,
        )
        .bind(&sub.stripe_customer_id)
        .bind(&sub.stripe_subscription_id)
        .bind(&sub.status)
        .bind(&sub.subscription_tier)
        .bind(sub.current_period_end)
        .bind(sub.user_id)
        .bind(expected_updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_inactive(&self, user_id: Uuid) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE subscribers
            SET status = 'inactive',
                stripe_subscription_id = NULL,
                subscription_tier = NULL,
                current_period_end = NULL,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
