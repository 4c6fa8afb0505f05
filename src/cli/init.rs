//! Init command implementation
//!
//! Writes a starter `tasklist.toml`, `.env.example`, `.gitignore` and the
//! `data/` directory.

use super::output::Output;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// tasklist.toml already exists and `--force` was not given
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing tasklist project");

    let base_path = &config.path;

    let config_path = base_path.join("tasklist.toml");
    if config_path.exists() && !config.force {
        output.warning("tasklist.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let data_dir = base_path.join("data");
    if data_dir.exists() {
        output.skipped("data", "already exists");
    } else {
        if let Err(e) = fs::create_dir_all(&data_dir) {
            output.error(&format!("Failed to create data: {}", e));
            return InitResult::Error(e.to_string());
        }
        output.created("directory", "data");
    }

    let files = [
        ("config", "tasklist.toml", generate_tasklist_toml(&config)),
        ("env", ".env.example", generate_env_example()),
    ];
    for (kind, name, content) in &files {
        match write_file(&base_path.join(name), content, config.force) {
            Ok(true) => output.created(kind, name),
            Ok(false) => output.skipped(name, "already exists"),
            Err(e) => {
                output.error(&format!("Failed to create {}: {}", name, e));
                return InitResult::Error(e.to_string());
            }
        }
    }

    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        match write_file(&gitignore_path, &generate_gitignore(), false) {
            Ok(_) => output.created("file", ".gitignore"),
            Err(e) => output.warning(&format!("Failed to create .gitignore: {}", e)),
        }
    }

    output.complete("tasklist project initialized");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set up environment variables:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set TASKLIST_JWT_SECRET (min 32 chars)");
    output.newline();
    output.info("2. Start the server:");
    output.command("tasklist-server");

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));

    InitResult::Success
}

/// Writes `content` unless `path` exists and `force` is off.
///
/// Returns whether the file was written.
fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    fs::write(path, content)?;
    Ok(true)
}

fn generate_tasklist_toml(config: &InitConfig) -> String {
    format!(
        r#"# tasklist-server configuration

[server]
host = "{host}"
port = {port}
log_level = "info"
# "pretty" for terminals, "json" for log collectors
log_format = "pretty"

[auth]
# Name of the environment variable holding the token signing secret
jwt_secret_env = "TASKLIST_JWT_SECRET"
token_lifetime_secs = 7200
issuer = "tasklist"
# "argon2" or "keyed-digest"
password_scheme = "argon2"
# Only read when password_scheme = "keyed-digest"
password_secret_env = "TASKLIST_PASSWORD_SECRET"

[database]
# SQLite file, or ":memory:" for an ephemeral store
url = "./data/tasklist.db"
# "sequence" or "snowflake"
id_generator = "sequence"
node_id = 0
"#,
        host = config.host,
        port = config.port
    )
}

fn generate_env_example() -> String {
    r#"# tasklist-server environment variables
# Copy this file to .env and fill in the values.

# REQUIRED: token signing secret (minimum 32 characters)
# Generate with: openssl rand -base64 32
TASKLIST_JWT_SECRET=change-me-in-production-use-at-least-32-characters

# Only for password_scheme = "keyed-digest"
# TASKLIST_PASSWORD_SECRET=change-me

# Optional: log filter, overrides server.log_level
RUST_LOG=info,tasklist=debug
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"/data/
*.db
*.db-journal
*.db-wal
*.db-shm

.env
.env.local

/target/
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::TaskListConfig;
    use tempfile::TempDir;

    fn create_test_config(temp_dir: &TempDir) -> InitConfig {
        InitConfig {
            path: temp_dir.path().to_path_buf(),
            force: false,
            host: "127.0.0.1".to_string(),
            port: 8888,
        }
    }

    #[test]
    fn test_generated_toml_parses() {
        let config = InitConfig {
            path: PathBuf::from("/tmp"),
            force: false,
            host: "0.0.0.0".to_string(),
            port: 9090,
        };

        let parsed = TaskListConfig::parse(&generate_tasklist_toml(&config)).unwrap();

        assert_eq!(parsed.bind_addr(), "0.0.0.0:9090");
        assert!(parsed.validate_values().is_ok());
    }

    #[test]
    fn test_generate_env_example() {
        let content = generate_env_example();

        assert!(content.contains("TASKLIST_JWT_SECRET="));
        assert!(content.contains("RUST_LOG"));
    }

    #[test]
    fn test_write_file_skips_existing_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, "original").expect("Failed to write");

        assert!(!write_file(&file_path, "new content", false).unwrap());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "original");

        assert!(write_file(&file_path, "new content", true).unwrap());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }

    #[test]
    fn test_run_creates_all_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let result = run(create_test_config(&temp_dir), &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        assert!(temp_dir.path().join("tasklist.toml").exists());
        assert!(temp_dir.path().join(".env.example").exists());
        assert!(temp_dir.path().join(".gitignore").exists());
        assert!(temp_dir.path().join("data").is_dir());
    }

    #[test]
    fn test_run_keeps_existing_env_example() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let env_path = temp_dir.path().join(".env.example");
        fs::write(&env_path, "TASKLIST_JWT_SECRET=mine").expect("Failed to write");

        let result = run(create_test_config(&temp_dir), &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        assert!(temp_dir.path().join("tasklist.toml").exists());
        assert_eq!(
            fs::read_to_string(&env_path).unwrap(),
            "TASKLIST_JWT_SECRET=mine"
        );
    }

    #[test]
    fn test_run_already_exists_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("tasklist.toml"), "existing").expect("Failed to write");

        let result = run(create_test_config(&temp_dir), &Output::no_color());

        assert!(matches!(result, InitResult::AlreadyExists));
        let content = fs::read_to_string(temp_dir.path().join("tasklist.toml")).unwrap();
        assert_eq!(content, "existing");
    }

    #[test]
    fn test_run_force_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("tasklist.toml"), "existing").expect("Failed to write");

        let config = InitConfig {
            force: true,
            ..create_test_config(&temp_dir)
        };
        let result = run(config, &Output::no_color());

        assert!(matches!(result, InitResult::Success));
        let content = fs::read_to_string(temp_dir.path().join("tasklist.toml")).unwrap();
        assert!(content.contains("[server]"));
        assert!(!content.contains("existing"));
    }
}
