//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the authentication core.

pub mod auth;
pub mod user;

pub use auth::AuthService;
pub use user::UserService;
