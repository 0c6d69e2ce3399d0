//! Storage seams consumed by the authentication core
//!
//! Implementations must make each call an atomic single-record operation
//! and give read-after-write consistency per record: once
//! `revoke_refresh_token` returns, no later `find_refresh_token` may see the
//! token as active.

use super::{RefreshTokenRecord, UserRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Duplicate key")]
    DuplicateKey,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateKey
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

/// Refresh token persistence
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert an active token. `DuplicateKey` if the token already exists.
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// Mark a token revoked. Idempotent: an already-revoked token keeps its
    /// first `revoked_at`. `NotFound` if the token does not exist.
    async fn revoke_refresh_token(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}

/// User credential persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `DuplicateKey` if the email is taken
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Replace email and password hash. `NotFound` or `DuplicateKey` on failure.
    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError>;
}

/// Bound a store call by `timeout`; an elapsed deadline is reported as
/// `Unavailable` and the in-flight operation is dropped.
pub async fn with_deadline<T, F>(timeout: Duration, op: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(timeout, op)
        .await
        .map_err(|_| StoreError::Unavailable("Store operation timed out".to_string()))?
}
