//! Configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::lockout::LockoutPolicy;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Document-store settings
    pub database: DatabaseConfig,

    /// Login lockout policy
    pub lockout: LockoutPolicy,
}

/// Document-store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string
    pub connection: String,

    /// Database name
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database: DatabaseConfig::default(),
            lockout: LockoutPolicy::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection: "mongodb://localhost:27017".to_string(),
            name: "storefront".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load configuration for the current process.
    ///
    /// Reads the file named by `STOREFRONT_CONFIG` when set, otherwise
    /// starts from defaults; `PORT`, `MONGODB_URI` and `DATABASE_NAME`
    /// override their file counterparts.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("STOREFRONT_CONFIG") {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }
        if let Ok(uri) = std::env::var("MONGODB_URI") {
            config.database.connection = uri;
        }
        if let Ok(name) = std::env::var("DATABASE_NAME") {
            config.database.name = name;
        }

        Ok(config)
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.port, 3000);
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert_eq!(config.lockout.max_attempts, 5);
        assert_eq!(config.lockout.window_minutes, 30);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = AppConfig::from_yaml_str("port: 8080\n").unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.database.name, "storefront");
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = AppConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = AppConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.port, config.port);
        assert_eq!(parsed.database.connection, config.database.connection);
    }

    #[test]
    fn test_lockout_section() {
        let yaml = "lockout:\n  max_attempts: 3\n  window_minutes: 10\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.lockout.max_attempts, 3);
        assert_eq!(config.lockout.window_minutes, 10);
    }
}
