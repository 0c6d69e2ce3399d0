//! Authentication module
//!
//! Argon2 password hashing, HS256 access tokens, store-backed refresh
//! tokens and `Authorization` header extraction.

pub mod api_key;
mod clock;
mod error;
pub mod header;
mod jwt;
mod middleware;
mod password;
mod refresh;

pub use api_key::authenticate_api_key;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthError;
pub use header::{extract_api_key, extract_bearer};
pub use jwt::{make_jwt, validate_jwt, Claims, JwtService, ISSUER};
pub use middleware::{auth_middleware, require_api_key, AuthUser, ServiceCaller};
pub use password::PasswordService;
pub use refresh::{RefreshTokenManager, REFRESH_TOKEN_BYTES};
