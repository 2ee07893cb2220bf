//! PostgreSQL profile repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::ProfileRow;
use crate::repo::{CreateProfile, ProfileRepository, UpdateProfile};

/// PostgreSQL profile repository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new profile repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ProfileRow>> {
        let profile = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, display_name, email, avatar_url, bio, subscription_tier,
                   likes_count, role, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<ProfileRow>> {
        let profile = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, display_name, email, avatar_url, bio, subscription_tier,
                   likes_count, role, created_at, updated_at
            FROM profiles
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn create(&self, profile: CreateProfile) -> DbResult<ProfileRow> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (id, display_name, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, display_name, email, avatar_url, bio, subscription_tier,
                      likes_count, role, created_at, updated_at
            "#,
        )
        .bind(profile.id)
        .bind(&profile.display_name)
        .bind(&profile.email)
        .bind(&profile.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_details(&self, id: Uuid, details: UpdateProfile) -> DbResult<ProfileRow> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles
            SET display_name = COALESCE($1, display_name),
                bio = COALESCE($2, bio),
                avatar_url = COALESCE($3, avatar_url),
                updated_at = NOW()
            WHERE id = $4
            RETURNING id, display_name, email, avatar_url, bio, subscription_tier,
                      likes_count, role, created_at, updated_at
            "#,
        )
        .bind(&details.display_name)
        .bind(&details.bio)
        .bind(&details.avatar_url)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_tier(&self, id: Uuid, tier: &str) -> DbResult<()> {
        sqlx::query("UPDATE profiles SET subscription_tier = $1, updated_at = NOW() WHERE id = $2")
            .bind(tier)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
