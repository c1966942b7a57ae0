use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Origins allowed to make cross-origin requests when nothing else is configured.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:8080",
    "http://localhost:1234",
    "https://mydrama.netlify.app",
    "http://localhost:4200",
    "https://almanowski.github.io",
];

/// Store URL selecting the in-memory store instead of Postgres.
pub const MEMORY_STORE_URL: &str = "memory:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string, or [`MEMORY_STORE_URL`].
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    /// Reject `/users/:username` requests whose token belongs to another user.
    pub enforce_ownership: bool,
}

impl DatabaseConfig {
    pub fn uses_memory_store(&self) -> bool {
        self.url == MEMORY_STORE_URL
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("cors_origins", &self.cors_origins)
            .field("enforce_ownership", &self.enforce_ownership)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("CONNECTION_URI"))
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        // Set defaults based on environment, then override with specific env vars
        let mut config = match environment {
            Environment::Production => Self::production(database_url, jwt_secret),
            Environment::Staging => Self::staging(database_url, jwt_secret),
            Environment::Development => Self::development(database_url, jwt_secret),
        };
        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("KDRAMA_API_PORT").or_else(|| lookup("PORT")) {
            self.server.port = parse("PORT", v)?;
        }
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", v)?;
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = parse("SECURITY_JWT_EXPIRY_HOURS", v)?;
        }
        if let Some(v) = lookup("SECURITY_BCRYPT_COST") {
            let cost: u32 = parse("SECURITY_BCRYPT_COST", v.clone())?;
            if !(4..=31).contains(&cost) {
                return Err(ConfigError::Invalid { name: "SECURITY_BCRYPT_COST", value: v });
            }
            self.security.bcrypt_cost = cost;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("SECURITY_ENFORCE_OWNERSHIP") {
            self.security.enforce_ownership = parse("SECURITY_ENFORCE_OWNERSHIP", v)?;
        }

        Ok(())
    }

    fn development(url: String, jwt_secret: String) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { host: "0.0.0.0".to_string(), port: 8080 },
            database: DatabaseConfig { url, max_connections: 10, connection_timeout: 30 },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24 * 7,
                bcrypt_cost: 10,
                cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
                enforce_ownership: false,
            },
        }
    }

    fn staging(url: String, jwt_secret: String) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { host: "0.0.0.0".to_string(), port: 8080 },
            database: DatabaseConfig { url, max_connections: 20, connection_timeout: 10 },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24 * 7,
                bcrypt_cost: 10,
                cors_origins: vec!["https://mydrama.netlify.app".to_string()],
                enforce_ownership: true,
            },
        }
    }

    fn production(url: String, jwt_secret: String) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { host: "0.0.0.0".to_string(), port: 8080 },
            database: DatabaseConfig { url, max_connections: 50, connection_timeout: 5 },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24 * 7,
                bcrypt_cost: 10,
                cors_origins: vec![
                    "https://mydrama.netlify.app".to_string(),
                    "https://almanowski.github.io".to_string(),
                ],
                enforce_ownership: true,
            },
        }
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid { name, value })
}
