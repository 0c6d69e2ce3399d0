//! Chirpy Shared Library
//!
//! Request/response types and input validation shared between the
//! backend and any client of the authentication API.

pub mod types;
pub mod validation;

pub use types::*;
