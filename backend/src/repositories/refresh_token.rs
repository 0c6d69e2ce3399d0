//! Refresh token repository for database operations

use super::StoreError;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Refresh token record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Refresh token repository for database operations
pub struct RefreshTokenRepository;

impl RefreshTokenRepository {
    /// Insert an active token
    pub async fn create(
        pool: &PgPool,
        token: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Find a token, active or revoked
    pub async fn find(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            SELECT token, user_id, created_at, updated_at, revoked_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Revoke a token; the first revocation time wins
    pub async fn revoke(
        pool: &PgPool,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens SET
                revoked_at = COALESCE(revoked_at, $2),
                updated_at = $2
            WHERE token = $1
            "#,
        )
        .bind(token)
        .bind(revoked_at)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
