//! Access token issuance and validation
//!
//! Access tokens are HS256 JWTs carrying `{iss, sub, iat, exp, jti}`. They
//! are stateless: validity is a pure function of the token, the secret and
//! the current time. Expiry is judged against the injected [`Clock`], never
//! against jsonwebtoken's own clock or leeway.

use super::{AuthError, Clock};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Fixed `iss` claim for every token this service mints
pub const ISSUER: &str = "chirpy";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    /// Subject (user ID, canonical hyphenated UUID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique per token, so two tokens minted in the same second differ
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Signature and claim-shape checks only; expiry is checked by hand so the
/// comparison is strict and clock-driven.
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.set_issuer(&[ISSUER]);
    validation
}

/// `exp` for a token minted at `now`. A positive lifetime rounds up to the
/// next whole second so the token is never dead on arrival; a non-positive
/// one rounds down so it always is.
fn expiry(now: DateTime<Utc>, ttl: Duration) -> Result<i64, AuthError> {
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::Signing("token lifetime out of range".to_string()))?;

    let exp = expires_at.timestamp();
    if ttl > Duration::zero() && expires_at.timestamp_subsec_nanos() > 0 {
        Ok(exp + 1)
    } else {
        Ok(exp)
    }
}

fn sign(
    keys: &JwtKeys,
    user_id: Uuid,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = Claims {
        iss: ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry(now, ttl)?,
        jti: Some(Uuid::new_v4().to_string()),
    };

    encode(&Header::new(Algorithm::HS256), &claims, keys.encoding())
        .map_err(|e| AuthError::Signing(e.to_string()))
}

fn verify(
    keys: &JwtKeys,
    validation: &Validation,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Uuid, AuthError> {
    let token_data = decode::<Claims>(token, keys.decoding(), validation).map_err(|e| {
        debug!(kind = ?e.kind(), "Access token rejected");
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                AuthError::InvalidSignature
            }
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                AuthError::MalformedCredential
            }
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) | ErrorKind::InvalidIssuer => {
                AuthError::MalformedClaims
            }
            _ => AuthError::InvalidSignature,
        }
    })?;

    let claims = token_data.claims;

    // Strict: a token is already dead at its exp second.
    if now.timestamp() >= claims.exp {
        return Err(AuthError::Expired);
    }

    Uuid::parse_str(&claims.sub).map_err(|_| AuthError::MalformedSubject)
}

/// Mint a token for `user_id` under `secret`, expiring `ttl` after `clock.now()`.
///
/// A zero or negative `ttl` produces a token that is already expired.
pub fn make_jwt(
    user_id: Uuid,
    secret: &str,
    ttl: Duration,
    clock: &dyn Clock,
) -> Result<String, AuthError> {
    sign(&JwtKeys::new(secret), user_id, ttl, clock.now())
}

/// Validate a token under `secret` and return the user it was issued for.
pub fn validate_jwt(token: &str, secret: &str, clock: &dyn Clock) -> Result<Uuid, AuthError> {
    verify(&JwtKeys::new(secret), &validation(), token, clock.now())
}

/// JWT service configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub access_token_expiry_secs: i64,
}

/// JWT service for token operations
///
/// Keys are derived once from the secret at construction and wrapped in
/// `Arc`, so clones are cheap.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    config: JwtConfig,
    clock: Arc<dyn Clock>,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    pub fn new(secret: &str, access_token_expiry_secs: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation()),
            config: JwtConfig {
                access_token_expiry_secs,
            },
            clock,
        }
    }

    /// Issue an access token with the configured lifetime
    #[inline]
    pub fn issue_access_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let ttl = Duration::try_seconds(self.config.access_token_expiry_secs)
            .ok_or_else(|| AuthError::Signing("access token lifetime out of range".to_string()))?;
        self.issue(user_id, ttl)
    }

    /// Issue an access token with an explicit lifetime
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, AuthError> {
        sign(&self.keys, user_id, ttl, self.clock.now())
    }

    /// Validate a token and return its subject
    #[inline]
    pub fn validate(&self, token: &str) -> Result<Uuid, AuthError> {
        verify(&self.keys, &self.validation, token, self.clock.now())
    }

    /// Get access token expiry in seconds
    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.config.access_token_expiry_secs
    }
}
