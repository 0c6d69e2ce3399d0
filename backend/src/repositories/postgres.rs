//! PostgreSQL-backed store

use super::{
    RefreshTokenRecord, RefreshTokenRepository, RefreshTokenStore, StoreError, UserRecord,
    UserRepository, UserStore,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Implements the store traits over a shared pool. Every call is a single
/// statement, so each write is atomic per record.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PgStore {
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        RefreshTokenRepository::create(&self.pool, token, user_id, created_at).await
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        RefreshTokenRepository::find(&self.pool, token).await
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        RefreshTokenRepository::revoke(&self.pool, token, revoked_at).await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        UserRepository::create(&self.pool, email, password_hash).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        UserRepository::find_by_email(&self.pool, email).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        UserRepository::find_by_id(&self.pool, id).await
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        UserRepository::update_credentials(&self.pool, id, email, password_hash).await
    }
}
