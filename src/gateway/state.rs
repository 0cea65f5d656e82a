use std::sync::Arc;
use std::time::Duration;

use crate::db::Database;
use crate::token::TokenMaker;
use crate::transfer::TransferEngine;

/// Gateway application state (shared across handlers)
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL pool for account and user queries
    pub db: Database,
    /// Transfer engine sharing the same pool
    pub engine: TransferEngine,
    /// Issues and verifies access tokens
    pub token_maker: Arc<dyn TokenMaker>,
    /// Lifetime of tokens issued at login
    pub access_token_duration: Duration,
}

impl AppState {
    pub fn new(
        db: Database,
        engine: TransferEngine,
        token_maker: Arc<dyn TokenMaker>,
        access_token_duration: Duration,
    ) -> Self {
        Self {
            db,
            engine,
            token_maker,
            access_token_duration,
        }
    }
}
