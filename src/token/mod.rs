//! Access tokens
//!
//! The request layer authenticates callers with signed, expiring tokens.
//! The transfer engine never sees them.

pub mod jwt;
pub mod payload;

pub use jwt::JwtMaker;
pub use payload::Payload;

use std::time::Duration;
use thiserror::Error;

/// Token verification failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,

    #[error("failed to create token: {0}")]
    Create(String),
}

/// Issues and verifies access tokens
pub trait TokenMaker: Send + Sync {
    /// Create a token for `username` valid for `duration`
    fn create_token(&self, username: &str, duration: Duration) -> Result<(String, Payload), TokenError>;

    /// Check a token and return its payload
    fn verify_token(&self, token: &str) -> Result<Payload, TokenError>;
}
