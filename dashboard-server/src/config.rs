//! Server config: bind address, database, logging. Loaded from env.

use std::env;
use std::net::SocketAddr;

use anyhow::Result;

/// Database used when neither a flag nor DATABASE_URL names one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://whatsflow.db";

/// Dashboard server config.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// BIND_ADDR, e.g. `127.0.0.1:8000`
    pub bind_addr: String,
    /// DATABASE_URL (SQLite `sqlite://path` or `sqlite::memory:`)
    pub database_url: String,
    /// LOG_FILE path
    pub log_file: String,
}

impl ServerConfig {
    /// Load from environment variables. `bind` and `database` override
    /// BIND_ADDR and DATABASE_URL if provided.
    pub fn load(bind: Option<String>, database: Option<String>) -> Result<Self> {
        let bind_addr = bind
            .or_else(|| env::var("BIND_ADDR").ok())
            .unwrap_or_else(|| "127.0.0.1:8000".to_string());
        let database_url = database
            .or_else(|| env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/whatsflow.log".to_string());

        let config = Self {
            bind_addr,
            database_url,
            log_file,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate config. Call after load() to fail fast before binding.
    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!(
                "BIND_ADDR is not a valid socket address: {}",
                self.bind_addr
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_override_defaults() {
        let config = ServerConfig::load(
            Some("0.0.0.0:9001".to_string()),
            Some("sqlite::memory:".to_string()),
        )
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9001");
        assert_eq!(config.database_url, "sqlite::memory:");
    }

    #[test]
    fn defaults_apply_when_flags_and_env_absent() {
        std::env::remove_var("BIND_ADDR");
        std::env::remove_var("DATABASE_URL");
        let config = ServerConfig::load(None, None).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let result = ServerConfig::load(Some("not-an-addr".to_string()), None);
        assert!(result.is_err());
    }
}
