//! Service configuration
//!
//! Every setting is read from the environment once, in `main`, and then
//! passed down as plain structs.

use anyhow::Result;
use common::database::DatabaseConfig;
use std::{net::SocketAddr, time::Duration};

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `HOST`: Interface to bind (default: 0.0.0.0)
    /// - `PORT`: Port to listen on (default: 8000)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let host = std::env::var("HOST").unwrap_or(defaults.host);
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT {:?}: {}", raw, e))?,
            Err(_) => defaults.port,
        };

        Ok(Self { host, port })
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}

/// Ledger store behaviour
#[derive(Debug, Clone, Default)]
pub struct LedgerConfig {
    /// Maximum session age; `None` keeps sessions until logout
    pub session_ttl: Option<Duration>,
}

impl LedgerConfig {
    /// Create a new LedgerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_TTL_SECONDS`: Maximum session age in seconds (default: unset, no expiry)
    pub fn from_env() -> Result<Self> {
        let session_ttl = match std::env::var("SESSION_TTL_SECONDS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid SESSION_TTL_SECONDS {:?}: {}", raw, e))?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self { session_ttl })
    }
}

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ledger: LedgerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            ledger: LedgerConfig::from_env()?,
        })
    }
}
