//! CLI module for the task list server
//!
//! Provides command-line interface parsing and handling for the tasklist-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod config;
pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tasklist-server - multi-user task list API
#[derive(Parser, Debug)]
#[command(
    name = "tasklist-server",
    version,
    about = "Multi-user task list API with JWT sessions",
    long_about = "Multi-user task list API. Users register and log in with a name and\n\
                  password, receive a signed session token, and manage their own tasks.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a config.",
    after_help = "EXAMPLES:\n    \
                  tasklist-server init                # Write tasklist.toml and .env.example\n    \
                  tasklist-server config --validate   # Check the config and its secrets\n    \
                  tasklist-server                     # Start the server\n    \
                  tasklist-server --config my.toml    # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "tasklist.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter tasklist.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "8888")]
        port: u16,
    },

    /// Show the resolved configuration with secrets masked
    Config {
        /// Also check that referenced secrets are present and long enough
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
