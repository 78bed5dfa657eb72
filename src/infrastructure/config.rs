//! Application configuration

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

/// Application configuration loaded from `MOGWAI_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Node JSON-RPC endpoint
    pub rpc_url: String,
    /// Node RPC username
    pub rpc_user: String,
    /// Node RPC password
    pub rpc_password: String,
    /// Wallet passphrase, unlocked briefly before each signature
    pub wallet_password: Option<String>,

    /// Block hash store; `memory` keeps hashes in process only
    pub database_url: String,

    /// HTTP server port
    pub server_port: u16,

    /// Wallet transactions fetched per RPC page
    pub tx_page_size: usize,
    /// Block hashes fetched in parallel during a cache sync
    pub cache_fetch_concurrency: usize,
    /// Seconds between background cache syncs
    pub cache_sync_interval_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::with_prefix("MOGWAI").try_parsing(true))
    }

    fn from_source(source: Environment) -> Result<Self> {
        Config::builder()
            .set_default("rpc_url", "http://127.0.0.1:17710")?
            .set_default("rpc_user", "mogwairpc")?
            .set_default("database_url", "sqlite://mogwai.db?mode=rwc")?
            .set_default("server_port", 3000)?
            .set_default("tx_page_size", 50)?
            .set_default("cache_fetch_concurrency", 16)?
            .set_default("cache_sync_interval_secs", 30)?
            .add_source(source)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration (MOGWAI_RPC_PASSWORD is required)")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("MOGWAI").try_parsing(true).source(Some(source))
    }

    #[test]
    fn test_defaults_apply() {
        let config = AppConfig::from_source(environment(&[("MOGWAI_RPC_PASSWORD", "secret")])).unwrap();

        assert_eq!(config.rpc_password, "secret");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.tx_page_size, 50);
        assert_eq!(config.database_url, "sqlite://mogwai.db?mode=rwc");
        assert!(config.wallet_password.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_source(environment(&[
            ("MOGWAI_RPC_PASSWORD", "secret"),
            ("MOGWAI_SERVER_PORT", "8080"),
            ("MOGWAI_DATABASE_URL", "memory"),
            ("MOGWAI_WALLET_PASSWORD", "unlock"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.database_url, "memory");
        assert_eq!(config.wallet_password.as_deref(), Some("unlock"));
    }

    #[test]
    fn test_rpc_password_is_required() {
        assert!(AppConfig::from_source(environment(&[])).is_err());
    }
}
