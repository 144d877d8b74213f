//! Server configuration.

use std::env;

/// Default port when `TASKS_SERVER_PORT` is unset or unparseable.
pub const DEFAULT_PORT: u16 = 3005;

/// Storage backend selected by `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process document store.
    Memory,
    /// SQLite database at the given URL.
    Sqlite(String),
}

impl StoreBackend {
    /// Parses a database URL.
    pub fn from_url(url: &str) -> anyhow::Result<Self> {
        if url == "memory" {
            Ok(Self::Memory)
        } else if url.starts_with("sqlite:") {
            Ok(Self::Sqlite(url.to_string()))
        } else {
            anyhow::bail!("Unsupported DATABASE_URL: {url} (expected `memory` or `sqlite:...`)")
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL.
    pub database_url: String,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "memory".to_string());
        // Fail at startup rather than on first request.
        StoreBackend::from_url(&database_url)?;

        Ok(Self {
            host: env::var("TASKS_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("TASKS_SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            database_url,
            log_level: env::var("TASKS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the storage backend named by the database URL.
    pub fn backend(&self) -> anyhow::Result<StoreBackend> {
        StoreBackend::from_url(&self.database_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // SAFETY: no other test in this crate touches these variables
        unsafe {
            env::remove_var("DATABASE_URL");
            env::remove_var("TASKS_SERVER_HOST");
            env::remove_var("TASKS_SERVER_PORT");
            env::remove_var("TASKS_LOG_LEVEL");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.server_addr(), "0.0.0.0:3005");
        assert_eq!(config.backend().unwrap(), StoreBackend::Memory);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_backend_from_url() {
        assert_eq!(StoreBackend::from_url("memory").unwrap(), StoreBackend::Memory);
        assert_eq!(
            StoreBackend::from_url("sqlite://tasks.db?mode=rwc").unwrap(),
            StoreBackend::Sqlite("sqlite://tasks.db?mode=rwc".to_string())
        );
        assert!(StoreBackend::from_url("mongodb://localhost/tasks").is_err());
    }
}
