use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Minimum length of the HMAC key used to sign access tokens.
pub const MIN_SYMMETRIC_KEY_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL. `DATABASE_URL` overrides it.
    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub token: TokenConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 50,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenConfig {
    /// HS256 secret. `TOKEN_SYMMETRIC_KEY` overrides it.
    pub symmetric_key: String,
    pub access_token_duration_secs: u64,
}

impl TokenConfig {
    pub fn access_token_duration(&self) -> Duration {
        Duration::from_secs(self.access_token_duration_secs)
    }
}

/// Transfer engine limits
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransferConfig {
    /// Postgres `lock_timeout` applied to every transfer transaction. 0 disables it.
    pub lock_timeout_ms: u64,
    /// Upper bound on a whole transfer transaction. 0 disables it.
    pub tx_timeout_ms: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 5_000,
            tx_timeout_ms: 10_000,
        }
    }
}

impl TransferConfig {
    pub fn lock_timeout(&self) -> Option<Duration> {
        (self.lock_timeout_ms > 0).then(|| Duration::from_millis(self.lock_timeout_ms))
    }

    pub fn tx_timeout(&self) -> Option<Duration> {
        (self.tx_timeout_ms > 0).then(|| Duration::from_millis(self.tx_timeout_ms))
    }
}

impl AppConfig {
    /// Load `config/{env}.yaml` and apply environment overrides.
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.postgres_url = Some(url);
        }
        if let Ok(key) = std::env::var("TOKEN_SYMMETRIC_KEY") {
            config.token.symmetric_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config yaml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.symmetric_key.len() < MIN_SYMMETRIC_KEY_LEN {
            bail!(
                "token.symmetric_key must be at least {} characters",
                MIN_SYMMETRIC_KEY_LEN
            );
        }
        if self.postgres_url.is_none() {
            bail!("postgres_url is not set (config file or DATABASE_URL)");
        }
        Ok(())
    }

    pub fn gateway_addr(&self) -> String {
        format!("{}:{}", self.gateway.host, self.gateway.port)
    }
}
