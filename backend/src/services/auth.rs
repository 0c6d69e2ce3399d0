//! Session orchestration
//!
//! Composes the header extractor, password hasher, access token service and
//! refresh token manager into the per-request operations the HTTP layer
//! calls.
//!
//! # Performance Optimizations
//!
//! - Password verification runs on the blocking thread pool
//! - JWT keys are derived once at construction
//! - Every store call is bounded by the configured deadline

use crate::auth::{
    authenticate_api_key, extract_bearer, AuthError, Clock, JwtService, PasswordService,
    RefreshTokenManager,
};
use crate::config::AppConfig;
use crate::repositories::{with_deadline, RefreshTokenStore, UserStore};
use axum::http::HeaderMap;
use chirpy_shared::{AccessToken, AuthTokens};
use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Verified when the email is unknown, so a login attempt costs one argon2
/// run whether or not the user exists.
const DUMMY_PASSWORD: &str = "chirpy-timing-equalizer";

/// Authentication service shared by all handlers
///
/// Cloning is cheap: every field is an `Arc` or wraps one.
#[derive(Clone)]
pub struct AuthService {
    jwt: JwtService,
    refresh: RefreshTokenManager,
    users: Arc<dyn UserStore>,
    api_key: Arc<SecretString>,
    dummy_hash: Arc<str>,
    store_timeout: std::time::Duration,
}

impl AuthService {
    /// Build the service from configuration and its collaborators.
    ///
    /// Fails if a configured token lifetime is out of range or the password
    /// hasher cannot draw a salt; the process refuses to start in either case.
    pub fn new(
        config: &AppConfig,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let store_timeout = config.auth.store_timeout();
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            clock.clone(),
        );
        let refresh_ttl = config
            .jwt
            .refresh_token_ttl_secs
            .map(|secs| {
                Duration::try_seconds(secs).ok_or_else(|| {
                    AuthError::Signing("refresh token lifetime out of range".to_string())
                })
            })
            .transpose()?;
        let refresh = RefreshTokenManager::new(refresh_tokens, clock, refresh_ttl, store_timeout);
        let dummy_hash = PasswordService::hash(DUMMY_PASSWORD)?;

        Ok(Self {
            jwt,
            refresh,
            users,
            api_key: Arc::new(SecretString::new(config.auth.api_key.clone())),
            dummy_hash: dummy_hash.into(),
            store_timeout,
        })
    }

    /// Resolve the caller of a protected endpoint from its bearer access token
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid, AuthError> {
        let token = extract_bearer(headers)?;
        self.jwt.validate(token)
    }

    /// Check a password and mint a fresh access/refresh pair
    ///
    /// Unknown email and wrong password both yield `CredentialMismatch`.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, AuthError> {
        let user = with_deadline(self.store_timeout, self.users.find_user_by_email(email)).await?;

        let hash = match &user {
            Some(u) => u.password_hash.clone(),
            None => self.dummy_hash.to_string(),
        };

        let valid = PasswordService::verify_async(password.to_string(), hash).await?;

        let user = match (user, valid) {
            (Some(user), true) => user,
            (known, _) => {
                debug!(known_user = known.is_some(), "Login rejected");
                return Err(AuthError::CredentialMismatch);
            }
        };

        let access_token = self.jwt.issue_access_token(user.id)?;
        let refresh_token = self.refresh.issue_for(user.id).await?;

        info!(user_id = %user.id, "User logged in");

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry_secs(),
            user: user.into(),
        })
    }

    /// Exchange a bearer refresh token for a new access token
    pub async fn refresh(&self, headers: &HeaderMap) -> Result<AccessToken, AuthError> {
        let token = extract_bearer(headers)?;
        let user_id = self.refresh.resolve_user(token).await?;
        let access_token = self.jwt.issue_access_token(user_id)?;

        debug!(%user_id, "Access token refreshed");

        Ok(AccessToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry_secs(),
        })
    }

    /// Revoke the bearer refresh token
    pub async fn revoke(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let token = extract_bearer(headers)?;
        self.refresh.revoke(token).await
    }

    /// Check a service-to-service caller against the configured API key
    pub fn authenticate_api_key(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        authenticate_api_key(headers, self.api_key.expose_secret())
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ManualClock, REFRESH_TOKEN_BYTES};
    use crate::repositories::{MemoryStore, UserStore};
    use axum::http::{header::AUTHORIZATION, HeaderValue};

    const EMAIL: &str = "a@x.com";
    const PASSWORD: &str = "secret123";

    struct Fixture {
        service: AuthService,
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
    }

    async fn fixture() -> Fixture {
        let mut config = AppConfig::default();
        config.auth.api_key = "f271c81ff7084ee5b99a5091b42d486e".to_string();
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::default());
        let hash = PasswordService::hash(PASSWORD).unwrap();
        store.create_user(EMAIL, &hash).await.unwrap();

        let service =
            AuthService::new(&config, store.clone(), store.clone(), clock.clone()).unwrap();
        Fixture { service, store, clock }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_login_issues_fresh_pair() {
        let f = fixture().await;

        let first = f.service.login(EMAIL, PASSWORD).await.unwrap();
        let second = f.service.login(EMAIL, PASSWORD).await.unwrap();

        assert_eq!(first.token_type, "Bearer");
        assert_eq!(first.expires_in, 3600);
        assert_eq!(first.refresh_token.len(), REFRESH_TOKEN_BYTES * 2);
        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);

        let user = f.store.find_user_by_email(EMAIL).await.unwrap().unwrap();
        let user_id = f.service.authenticate(&bearer(&first.access_token)).unwrap();
        assert_eq!(user_id, user.id);
        assert_eq!(first.user.id, user.id);
        assert_eq!(first.user.email, EMAIL);
    }

    #[tokio::test]
    async fn test_access_token_expires_after_an_hour() {
        let f = fixture().await;
        let tokens = f.service.login(EMAIL, PASSWORD).await.unwrap();

        f.clock.advance(Duration::minutes(59));
        assert!(f.service.authenticate(&bearer(&tokens.access_token)).is_ok());

        f.clock.advance(Duration::minutes(1));
        assert!(matches!(
            f.service.authenticate(&bearer(&tokens.access_token)),
            Err(AuthError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_alike() {
        let f = fixture().await;

        let unknown = f.service.login("nobody@x.com", PASSWORD).await;
        let wrong = f.service.login(EMAIL, "not-the-password").await;

        assert!(matches!(unknown, Err(AuthError::CredentialMismatch)));
        assert!(matches!(wrong, Err(AuthError::CredentialMismatch)));
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_reported() {
        let f = fixture().await;
        f.store.create_user("broken@x.com", "plaintext-oops").await.unwrap();

        let result = f.service.login("broken@x.com", PASSWORD).await;
        assert!(matches!(result, Err(AuthError::CorruptCredential(_))));
    }

    #[tokio::test]
    async fn test_refresh_mints_new_access_token() {
        let f = fixture().await;
        let tokens = f.service.login(EMAIL, PASSWORD).await.unwrap();

        let refreshed = f.service.refresh(&bearer(&tokens.refresh_token)).await.unwrap();
        assert_ne!(refreshed.access_token, tokens.access_token);

        let original = f.service.authenticate(&bearer(&tokens.access_token)).unwrap();
        let renewed = f.service.authenticate(&bearer(&refreshed.access_token)).unwrap();
        assert_eq!(original, renewed);
    }

    #[tokio::test]
    async fn test_refresh_after_revoke_is_revoked() {
        let f = fixture().await;
        let tokens = f.service.login(EMAIL, PASSWORD).await.unwrap();
        let headers = bearer(&tokens.refresh_token);

        f.service.revoke(&headers).await.unwrap();

        assert!(matches!(f.service.refresh(&headers).await, Err(AuthError::Revoked)));
    }

    #[tokio::test]
    async fn test_access_token_is_not_a_refresh_token() {
        let f = fixture().await;
        let tokens = f.service.login(EMAIL, PASSWORD).await.unwrap();

        let result = f.service.refresh(&bearer(&tokens.access_token)).await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_refresh_without_header() {
        let f = fixture().await;
        let result = f.service.refresh(&HeaderMap::new()).await;
        assert!(matches!(result, Err(AuthError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_store_outage_during_login() {
        let f = fixture().await;
        f.store.set_available(false);

        let result = f.service.login(EMAIL, PASSWORD).await;
        assert!(matches!(result, Err(AuthError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_api_key_check() {
        let f = fixture().await;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_static("ApiKey f271c81ff7084ee5b99a5091b42d486e"),
        );
        assert!(f.service.authenticate_api_key(&headers).is_ok());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("ApiKey nope"));
        assert!(matches!(
            f.service.authenticate_api_key(&headers),
            Err(AuthError::CredentialMismatch)
        ));
    }

    #[test]
    fn test_out_of_range_refresh_ttl_fails_construction() {
        let mut config = AppConfig::default();
        config.jwt.refresh_token_ttl_secs = Some(i64::MAX);
        let store = Arc::new(MemoryStore::new());

        let clock = Arc::new(ManualClock::default());

        let result = AuthService::new(&config, store.clone(), store, clock);
        assert!(matches!(result, Err(AuthError::Signing(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_access_expiry_fails_login_without_panic() {
        let mut config = AppConfig::default();
        config.jwt.access_token_expiry_secs = i64::MAX;
        let store = Arc::new(MemoryStore::new());
        let hash = PasswordService::hash(PASSWORD).unwrap();
        store.create_user(EMAIL, &hash).await.unwrap();
        let clock = Arc::new(ManualClock::default());
        let service = AuthService::new(&config, store.clone(), store, clock).unwrap();

        let result = service.login(EMAIL, PASSWORD).await;
        assert!(matches!(result, Err(AuthError::Signing(_))));
    }
}
