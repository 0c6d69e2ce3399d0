//! `Authorization` header parsing
//!
//! Both credential kinds share one format, `Authorization: <Scheme> <value>`,
//! and differ only in the scheme keyword. Extraction is pure; validating the
//! returned value is the caller's job.

use super::AuthError;
use axum::http::{header::AUTHORIZATION, HeaderMap};

pub const BEARER_SCHEME: &str = "Bearer";
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract_credential(headers, BEARER_SCHEME)
}

/// Extract the key from `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    extract_credential(headers, API_KEY_SCHEME)
}

/// The header must split on single spaces into exactly two segments, the
/// first equal to `scheme` (case-sensitive). The second is returned verbatim.
fn extract_credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)?;

    if value.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    let mut segments = value.split(' ');
    let (Some(found), Some(credential), None) = (segments.next(), segments.next(), segments.next())
    else {
        return Err(AuthError::MalformedCredential);
    };

    if found != scheme {
        return Err(AuthError::MalformedCredential);
    }
    if credential.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    Ok(credential)
}
