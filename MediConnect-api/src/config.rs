//! Process configuration, read from the environment (optionally seeded from `.env`).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use mediconnect_domain::auth::password::DEFAULT_BCRYPT_COST;
use mediconnect_domain::auth::{PasswordHasher, TokenConfig};
use tracing::warn;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_DIR: &str = "data";
const DATABASE_FILE: &str = "mediconnect.db";

/// Deployment name reported by /health
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment(pub String);

impl Default for Environment {
    fn default() -> Self {
        Self("development".to_string())
    }
}

/// Settings for the API server
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port (`PORT`)
    pub port: u16,
    /// Directory holding the SQLite file (`DATA_DIR`)
    pub data_dir: PathBuf,
    /// bcrypt cost (`BCRYPT_COST`)
    pub bcrypt_cost: u32,
    /// Deployment name reported by /health (`APP_ENV`)
    pub environment: Environment,
    /// Access token settings (`JWT_*`)
    pub token: TokenConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            data_dir: lookup("DATA_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST),
            environment: lookup("APP_ENV")
                .filter(|name| !name.trim().is_empty())
                .map(Environment)
                .unwrap_or_default(),
            token: TokenConfig::from_lookup(&lookup),
        }
    }

    /// Default SQLite file inside the data directory
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn password_hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.bcrypt_cost)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} '{}', using {}", key, raw, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.environment, Environment::default());
        assert_eq!(config.database_path(), PathBuf::from("data").join("mediconnect.db"));
        assert_eq!(config.token.issuer(), "mediconnect-api");
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = config(&[
            ("PORT", "8080"),
            ("BCRYPT_COST", "lots"),
            ("DATA_DIR", "/tmp/mediconnect"),
            ("APP_ENV", "production"),
            ("ACCESS_TOKEN_EXPIRATION_MINUTES", "5"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/mediconnect"));
        assert_eq!(config.environment.0, "production");
        assert_eq!(config.token.expires_in(), 300);
    }
}
