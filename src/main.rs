//! simplebank server
//!
//! ```text
//! simplebank [--env <name>]
//! ```
//!
//! Loads `config/<name>.yaml` (default `dev`), applies migrations and
//! serves the HTTP API until Ctrl+C.

use std::sync::Arc;

use anyhow::Context;

use simplebank::config::AppConfig;
use simplebank::db::Database;
use simplebank::gateway::{self, AppState};
use simplebank::logging::init_logging;
use simplebank::token::JwtMaker;
use simplebank::transfer::TransferEngine;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = init_logging(&app_config);

    tracing::info!(env = %env, git_hash = env!("GIT_HASH"), "Starting simplebank");

    let database_url = app_config
        .postgres_url
        .as_deref()
        .context("postgres_url is not configured (set it in YAML or DATABASE_URL)")?;

    let db = Database::connect(database_url, &app_config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    db.migrate().await.context("Failed to apply migrations")?;

    let token_maker = JwtMaker::new(&app_config.token.symmetric_key)
        .context("Failed to create token maker")?;
    let engine = TransferEngine::from_config(db.pool().clone(), &app_config.transfer);

    let state = Arc::new(AppState::new(
        db,
        engine,
        Arc::new(token_maker),
        app_config.token.access_token_duration(),
    ));

    gateway::run_server(&app_config.gateway_addr(), state).await
}
