//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! The signing secret and API key are read from configuration once, here,
//! and never mutated afterwards.

use crate::auth::{AuthError, Clock, SystemClock};
use crate::config::AppConfig;
use crate::repositories::{PgStore, RefreshTokenStore, UserStore};
use crate::services::AuthService;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
///
/// All fields are designed for cheap cloning across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Session orchestration with pre-computed JWT keys
    pub auth: AuthService,
    /// User persistence
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Create the production state: Postgres-backed stores and the system clock.
    pub fn new(db: PgPool, config: AppConfig) -> Result<Self, AuthError> {
        let store = Arc::new(PgStore::new(db.clone()));
        Self::with_stores(db, config, store.clone(), store, Arc::new(SystemClock))
    }

    /// Create a state over arbitrary stores and clock
    pub fn with_stores(
        db: PgPool,
        config: AppConfig,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let auth = AuthService::new(&config, users.clone(), refresh_tokens, clock)?;

        Ok(Self {
            db,
            config: Arc::new(config),
            auth,
            users,
        })
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the authentication service
    #[inline]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Get a reference to the user store
    #[inline]
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// Deadline for a single store call
    #[inline]
    pub fn store_timeout(&self) -> Duration {
        self.config.auth.store_timeout()
    }
}
