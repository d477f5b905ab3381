//! Configuration for the data layer.
//!
//! All settings come from environment variables (or the matching CLI flags),
//! mirroring the deployment contract of the marketplace backend: discrete
//! `DB_*` keys rather than a connection URL.

use clap::Parser;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::time::Duration;

use crate::error::{DbError, DbResult};

pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;
pub const DEFAULT_CONNECT_RETRY_DELAY_MS: u64 = 500;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Layette data layer.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "layette-db",
    about = "Relational data layer for the Layette baby-products marketplace",
    version
)]
pub struct Config {
    /// Database server host
    #[arg(long, env = "DB_SERVER", default_value = "localhost")]
    pub server: String,

    /// Database name
    #[arg(long, env = "DB_DATABASE", default_value = "layette")]
    pub database: String,

    /// Database user (required)
    #[arg(long, env = "DB_USER")]
    pub user: Option<String>,

    /// Database password (required)
    #[arg(long, env = "DB_PASSWORD")]
    pub password: Option<String>,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Encrypt the connection (TLS)
    #[arg(long, env = "DB_ENCRYPT")]
    pub encrypt: bool,

    /// Skip server certificate verification when encrypting
    #[arg(long, env = "DB_TRUST_SERVER_CERTIFICATE")]
    pub trust_server_certificate: bool,

    /// Connection attempts before startup fails
    #[arg(long, env = "DB_CONNECT_ATTEMPTS", default_value_t = DEFAULT_CONNECT_ATTEMPTS)]
    pub connect_attempts: u32,

    /// Fixed delay between connection attempts, in milliseconds
    #[arg(long, env = "DB_CONNECT_RETRY_DELAY_MS", default_value_t = DEFAULT_CONNECT_RETRY_DELAY_MS)]
    pub connect_retry_delay_ms: u64,

    /// Maximum connections in the shared pool
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Pool acquire timeout in seconds
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT", default_value_t = DEFAULT_ACQUIRE_TIMEOUT_SECS)]
    pub acquire_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "LOG_JSON")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            server: "localhost".to_string(),
            database: "layette".to_string(),
            user: None,
            password: None,
            port: DEFAULT_PORT,
            encrypt: false,
            trust_server_certificate: false,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            connect_retry_delay_ms: DEFAULT_CONNECT_RETRY_DELAY_MS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Check that the required credentials are present. Runs before any
    /// connection attempt; a failure here is fatal to startup.
    pub fn validate(&self) -> DbResult<()> {
        let missing = |v: &Option<String>| v.as_deref().is_none_or(str::is_empty);
        if missing(&self.user) || missing(&self.password) {
            return Err(DbError::configuration(
                "DB_USER and DB_PASSWORD are required",
            ));
        }
        Ok(())
    }

    /// TLS mode derived from the two transport flags.
    ///
    /// encrypt=false disables TLS; encrypt with a trusted (unverified)
    /// server certificate maps to `require`; encrypt with verification maps
    /// to `verify-full`.
    pub fn ssl_mode(&self) -> PgSslMode {
        if !self.encrypt {
            PgSslMode::Disable
        } else if self.trust_server_certificate {
            PgSslMode::Require
        } else {
            PgSslMode::VerifyFull
        }
    }

    /// Driver connect options for the configured server.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.server)
            .port(self.port)
            .database(&self.database)
            .username(self.user.as_deref().unwrap_or_default())
            .password(self.password.as_deref().unwrap_or_default())
            .ssl_mode(self.ssl_mode())
    }

    /// Fixed delay between connection attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.connect_retry_delay_ms)
    }

    /// Pool acquire timeout as a Duration.
    pub fn acquire_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_credentials() -> Config {
        Config {
            user: Some("app".to_string()),
            password: Some("secret".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.connect_attempts, DEFAULT_CONNECT_ATTEMPTS);
        assert_eq!(config.connect_retry_delay_ms, DEFAULT_CONNECT_RETRY_DELAY_MS);
        assert!(!config.encrypt);
    }

    #[test]
    fn test_validate_missing_user() {
        let config = Config {
            password: Some("secret".to_string()),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DbError::Configuration { .. }));
        assert!(err.to_string().contains("DB_USER and DB_PASSWORD"));
    }

    #[test]
    fn test_validate_empty_password() {
        let config = Config {
            user: Some("app".to_string()),
            password: Some(String::new()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        assert!(config_with_credentials().validate().is_ok());
    }

    #[test]
    fn test_ssl_mode_mapping() {
        let mut config = Config::default();
        assert!(matches!(config.ssl_mode(), PgSslMode::Disable));

        config.encrypt = true;
        config.trust_server_certificate = true;
        assert!(matches!(config.ssl_mode(), PgSslMode::Require));

        config.trust_server_certificate = false;
        assert!(matches!(config.ssl_mode(), PgSslMode::VerifyFull));
    }

    #[test]
    fn test_retry_delay() {
        let config = Config {
            connect_retry_delay_ms: 250,
            ..Config::default()
        };
        assert_eq!(config.retry_delay(), Duration::from_millis(250));
    }
}
