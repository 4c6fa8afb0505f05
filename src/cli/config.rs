//! Config command implementation
//!
//! Prints the resolved configuration. Secret values are never printed; each
//! referenced variable is shown as set (with its length) or missing.

use super::output::Output;
use crate::utils::toml_config::{ConfigError, PasswordScheme, TaskListConfig};
use std::path::Path;

/// Describes an env-var-held secret without revealing it.
pub fn mask_secret(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("set ({} bytes)", v.len()),
        None => "missing".to_string(),
    }
}

/// Run the config command
pub fn run(path: &Path, validate: bool, output: &Output) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = TaskListConfig::parse(&std::fs::read_to_string(path)?)?;

    output.header("Server");
    output.kv("bind", &config.bind_addr());
    output.kv("log_level", &config.server.log_level);
    output.kv("log_format", &format!("{:?}", config.server.log_format).to_lowercase());

    output.header("Auth");
    let jwt_secret = config.resolve_env(&config.auth.jwt_secret_env);
    output.kv(
        &config.auth.jwt_secret_env,
        &mask_secret(jwt_secret.as_deref()),
    );
    output.kv(
        "token_lifetime_secs",
        &config.auth.token_lifetime_secs.to_string(),
    );
    output.kv("issuer", &config.auth.issuer);
    output.kv("password_scheme", &format!("{:?}", config.auth.password_scheme));
    if config.auth.password_scheme == PasswordScheme::KeyedDigest {
        let password_secret = config.resolve_env(&config.auth.password_secret_env);
        output.kv(
            &config.auth.password_secret_env,
            &mask_secret(password_secret.as_deref()),
        );
    }

    output.header("Database");
    output.kv("url", &config.database.url);
    output.kv("id_generator", &format!("{:?}", config.database.id_generator));
    output.kv("node_id", &config.database.node_id.to_string());

    if validate {
        config.validate()?;
        output.newline();
        output.success("Configuration is valid");
    }

    Ok(())
}
