//! Database repositories
//!
//! Provides the data access layer and the store traits the authentication
//! core is written against.

pub mod memory;
pub mod postgres;
pub mod refresh_token;
pub mod store;
pub mod user;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use refresh_token::{RefreshTokenRecord, RefreshTokenRepository};
pub use store::{with_deadline, RefreshTokenStore, StoreError, UserStore};
pub use user::{UserRecord, UserRepository};
