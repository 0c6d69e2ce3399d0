//! User service for registration and credential management
//!
//! # Performance Optimizations
//!
//! - Password hashing runs on blocking thread pool

use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::repositories::{with_deadline, StoreError, UserStore};
use chirpy_shared::{
    validation::{validate_email, validate_password},
    UserProfile,
};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// User service for account operations
pub struct UserService;

impl UserService {
    /// Register a new user
    pub async fn register(
        users: &dyn UserStore,
        timeout: Duration,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        validate_credentials(email, password)?;

        let password_hash = PasswordService::hash_async(password.to_string()).await?;

        let user = with_deadline(timeout, users.create_user(email, &password_hash))
            .await
            .map_err(store_error)?;

        info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    /// Replace the email and password of an authenticated user
    pub async fn update_credentials(
        users: &dyn UserStore,
        timeout: Duration,
        user_id: Uuid,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        validate_credentials(email, password)?;

        let password_hash = PasswordService::hash_async(password.to_string()).await?;

        let user = with_deadline(timeout, users.update_user(user_id, email, &password_hash))
            .await
            .map_err(store_error)?;

        info!(%user_id, "User credentials updated");
        Ok(user.into())
    }

    /// Get user profile
    pub async fn get_profile(
        users: &dyn UserStore,
        timeout: Duration,
        user_id: Uuid,
    ) -> Result<UserProfile, ApiError> {
        let user = with_deadline(timeout, users.find_user_by_id(user_id))
            .await
            .map_err(store_error)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    validate_email(email).map_err(ApiError::Validation)?;
    validate_password(password).map_err(ApiError::Validation)
}

fn store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::DuplicateKey => ApiError::Conflict("Email already registered".to_string()),
        StoreError::NotFound => ApiError::NotFound("User not found".to_string()),
        StoreError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
    }
}
