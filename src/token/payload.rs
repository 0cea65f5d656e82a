//! Token payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::TokenError;

/// Data carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub id: Uuid,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl Payload {
    pub fn new(username: &str, duration: Duration) -> Result<Self, TokenError> {
        let issued_at = Utc::now();
        let duration = chrono::Duration::from_std(duration)
            .map_err(|e| TokenError::Create(e.to_string()))?;
        let expired_at = issued_at
            .checked_add_signed(duration)
            .ok_or_else(|| TokenError::Create("expiry out of range".to_string()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            issued_at,
            expired_at,
        })
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expired_at
    }
}
