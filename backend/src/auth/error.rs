//! Authentication error taxonomy
//!
//! Every variant is recoverable at the request boundary. The HTTP layer
//! collapses the credential variants into a single "unauthorized" outcome,
//! so callers cannot tell which step of a check failed.

use crate::repositories::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No `Authorization` header, or a scheme with no value
    #[error("Missing credential")]
    MissingCredential,

    /// Header present but not `<Scheme> <value>` with the expected scheme
    #[error("Malformed credential")]
    MalformedCredential,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    /// Signature checks out but the claim set is unusable
    #[error("Malformed token claims")]
    MalformedClaims,

    /// Subject claim is not a canonical user id
    #[error("Malformed token subject")]
    MalformedSubject,

    /// Password or API key did not match
    #[error("Credential mismatch")]
    CredentialMismatch,

    #[error("Not found")]
    NotFound,

    #[error("Refresh token revoked")]
    Revoked,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Stored password hash could not be parsed or used
    #[error("Corrupt stored credential: {0}")]
    CorruptCredential(String),

    /// Signing primitive or entropy source failed
    #[error("Signing failure: {0}")]
    Signing(String),
}

impl AuthError {
    /// True for failures that mean "this caller is not authenticated", as
    /// opposed to infrastructure faults.
    pub fn is_credential_failure(&self) -> bool {
        !matches!(
            self,
            AuthError::StoreUnavailable(_) | AuthError::CorruptCredential(_) | AuthError::Signing(_)
        )
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AuthError::NotFound,
            other => AuthError::StoreUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        assert!(matches!(AuthError::from(StoreError::NotFound), AuthError::NotFound));
    }

    #[test]
    fn test_store_outage_maps_to_unavailable() {
        let err = AuthError::from(StoreError::Unavailable("connection refused".to_string()));
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
        assert!(!err.is_credential_failure());
    }

    #[test]
    fn test_credential_failures() {
        assert!(AuthError::Revoked.is_credential_failure());
        assert!(AuthError::Expired.is_credential_failure());
        assert!(!AuthError::CorruptCredential("bad".to_string()).is_credential_failure());
    }
}
