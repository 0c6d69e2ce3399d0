//! Refresh token lifecycle
//!
//! Refresh tokens are opaque: 32 bytes from the OS CSPRNG, hex-encoded to 64
//! lowercase characters. All state lives in the [`RefreshTokenStore`]; the
//! manager only generates tokens and sequences store calls.
//!
//! ```text
//! Active --revoke--> Revoked   (terminal)
//! ```

use super::{AuthError, Clock};
use crate::repositories::{with_deadline, RefreshTokenStore, StoreError};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Entropy per refresh token
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Issues, resolves and revokes store-backed refresh tokens
#[derive(Clone)]
pub struct RefreshTokenManager {
    store: Arc<dyn RefreshTokenStore>,
    clock: Arc<dyn Clock>,
    /// `None` means tokens live until revoked
    ttl: Option<Duration>,
    store_timeout: std::time::Duration,
}

impl RefreshTokenManager {
    pub fn new(
        store: Arc<dyn RefreshTokenStore>,
        clock: Arc<dyn Clock>,
        ttl: Option<Duration>,
        store_timeout: std::time::Duration,
    ) -> Self {
        Self {
            store,
            clock,
            ttl,
            store_timeout,
        }
    }

    /// Draw a fresh token from the OS random source
    pub fn generate() -> Result<String, AuthError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| AuthError::Signing(format!("Entropy source failed: {}", e)))?;
        Ok(hex::encode(bytes))
    }

    /// Generate and persist a new active token for `user_id`
    pub async fn issue_for(&self, user_id: Uuid) -> Result<String, AuthError> {
        // A collision on 256 random bits means the entropy source is broken;
        // one retry distinguishes that from a freak event.
        for attempt in 0..2 {
            let token = Self::generate()?;
            let created_at = self.clock.now();

            match with_deadline(
                self.store_timeout,
                self.store.create_refresh_token(&token, user_id, created_at),
            )
            .await
            {
                Ok(()) => {
                    info!(%user_id, "Refresh token issued");
                    return Ok(token);
                }
                Err(StoreError::DuplicateKey) => {
                    warn!(%user_id, attempt, "Refresh token collision");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AuthError::StoreUnavailable(
            "Repeated refresh token collision".to_string(),
        ))
    }

    /// Map an active token back to the user it was issued for
    pub async fn resolve_user(&self, token: &str) -> Result<Uuid, AuthError> {
        let record = with_deadline(self.store_timeout, self.store.find_refresh_token(token))
            .await?
            .ok_or(AuthError::NotFound)?;

        if record.revoked_at.is_some() {
            return Err(AuthError::Revoked);
        }

        // A deadline past the end of representable time never arrives.
        let expires_at = self.ttl.and_then(|ttl| record.created_at.checked_add_signed(ttl));
        if let Some(expires_at) = expires_at {
            if self.clock.now() >= expires_at {
                return Err(AuthError::Expired);
            }
        }

        Ok(record.user_id)
    }

    /// Retire a token
    ///
    /// The token must exist. Revoking an already-revoked token succeeds and
    /// keeps the original revocation time.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let record = with_deadline(self.store_timeout, self.store.find_refresh_token(token))
            .await?
            .ok_or(AuthError::NotFound)?;

        if record.revoked_at.is_some() {
            debug!(user_id = %record.user_id, "Refresh token already revoked");
            return Ok(());
        }

        with_deadline(
            self.store_timeout,
            self.store.revoke_refresh_token(token, self.clock.now()),
        )
        .await?;

        info!(user_id = %record.user_id, "Refresh token revoked");
        Ok(())
    }
}
