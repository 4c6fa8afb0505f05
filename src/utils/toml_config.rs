//! TOML-based configuration for the task list server
//!
//! Infrastructure settings live in `tasklist.toml`. Secrets are never written
//! into the file: it names the environment variables that hold them, and a
//! `.env` file is loaded into the environment before the config is resolved.

use crate::db::ids::MAX_NODE_ID;
use crate::db::DatabaseProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Shortest accepted token signing secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Root configuration structure loaded from tasklist.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Authentication Configuration =============

/// How password digests are computed and stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordScheme {
    /// Argon2id with a per-user salt
    #[default]
    Argon2,
    /// Unsalted SHA-256 over a server secret and the password
    KeyedDigest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the token signing secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    #[serde(default = "default_token_lifetime_secs")]
    pub token_lifetime_secs: i64,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default)]
    pub password_scheme: PasswordScheme,

    /// Environment variable name containing the keyed-digest secret
    #[serde(default = "default_password_secret_env")]
    pub password_secret_env: String,
}

fn default_jwt_secret_env() -> String {
    "TASKLIST_JWT_SECRET".to_string()
}

fn default_token_lifetime_secs() -> i64 {
    7200
}

fn default_issuer() -> String {
    "tasklist".to_string()
}

fn default_password_secret_env() -> String {
    "TASKLIST_PASSWORD_SECRET".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            token_lifetime_secs: default_token_lifetime_secs(),
            issuer: default_issuer(),
            password_scheme: PasswordScheme::default(),
            password_secret_env: default_password_secret_env(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdGeneratorKind {
    /// Counter seeded past the highest stored id
    #[default]
    Sequence,
    /// Timestamp + node + sequence
    Snowflake,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:` for the in-memory store
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default)]
    pub id_generator: IdGeneratorKind,

    /// Snowflake node id, unique per running process
    #[serde(default)]
    pub node_id: i64,
}

fn default_database_url() -> String {
    "./data/tasklist.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            id_generator: IdGeneratorKind::default(),
            node_id: 0,
        }
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl TaskListConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Parse without validating
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check value ranges, then that every referenced secret is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_values()?;

        let secret = self.jwt_secret()?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::ValidationError(format!(
                "{} must be at least {} bytes",
                self.auth.jwt_secret_env, MIN_JWT_SECRET_LEN
            )));
        }

        if self.auth.password_scheme == PasswordScheme::KeyedDigest
            && self.password_secret()?.is_empty()
        {
            return Err(ConfigError::ValidationError(format!(
                "{} must not be empty",
                self.auth.password_secret_env
            )));
        }

        Ok(())
    }

    /// Range checks that do not touch the environment.
    pub fn validate_values(&self) -> Result<(), ConfigError> {
        if self.auth.token_lifetime_secs <= 0 {
            return Err(ConfigError::ValidationError(
                "auth.token_lifetime_secs must be positive".to_string(),
            ));
        }

        if self.auth.issuer.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.issuer must not be empty".to_string(),
            ));
        }

        if !(0..=MAX_NODE_ID).contains(&self.database.node_id) {
            return Err(ConfigError::ValidationError(format!(
                "database.node_id must be in 0..={}",
                MAX_NODE_ID
            )));
        }

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Get the token signing secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.jwt_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))
    }

    /// Get the keyed-digest secret from the environment
    pub fn password_secret(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.password_secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.password_secret_env.clone()))
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn database_provider(&self) -> DatabaseProvider {
        DatabaseProvider::from_url(&self.database.url)
    }
}
