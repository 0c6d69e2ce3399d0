//! Static API key check for service-to-service callers

use super::{header::extract_api_key, AuthError};
use axum::http::HeaderMap;

/// Succeeds only when `Authorization: ApiKey <key>` carries exactly
/// `configured_key`. An empty configured key rejects every caller.
pub fn authenticate_api_key(headers: &HeaderMap, configured_key: &str) -> Result<(), AuthError> {
    let presented = extract_api_key(headers)?;

    if configured_key.is_empty() || presented.as_bytes() != configured_key.as_bytes() {
        return Err(AuthError::CredentialMismatch);
    }

    Ok(())
}
