//! In-process store
//!
//! Backs router tests and local runs without Postgres. Each map sits behind
//! its own `RwLock`, which gives the same per-record atomicity and
//! read-after-write visibility the Postgres store provides.

use super::{RefreshTokenRecord, RefreshTokenStore, StoreError, UserRecord, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
    refresh_tokens: RwLock<HashMap<String, RefreshTokenRecord>>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            refresh_tokens: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage: while unavailable every call fails with
    /// `StoreError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("Memory store offline".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut tokens = self.refresh_tokens.write().await;
        if tokens.contains_key(token) {
            return Err(StoreError::DuplicateKey);
        }
        tokens.insert(
            token.to_string(),
            RefreshTokenRecord {
                token: token.to_string(),
                user_id,
                created_at,
                updated_at: created_at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        self.check_available()?;
        Ok(self.refresh_tokens.read().await.get(token).cloned())
    }

    async fn revoke_refresh_token(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut tokens = self.refresh_tokens.write().await;
        let record = tokens.get_mut(token).ok_or(StoreError::NotFound)?;
        record.revoked_at.get_or_insert(revoked_at);
        record.updated_at = revoked_at;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        self.check_available()?;
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateKey);
        }
        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        self.check_available()?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        self.check_available()?;
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email && u.id != id) {
            return Err(StoreError::DuplicateKey);
        }
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.email = email.to_string();
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}
