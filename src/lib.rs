//! # tasklist - multi-user task list server
//!
//! Users register with a name and password, log in to receive a signed
//! session token, and manage a private list of tasks with it.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `tasklist-server` binary
//! 2. **As a library** - Build the router around your own stores
//!
//! ### Library Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tasklist::auth::{jwt::TokenCodec, password::Argon2PasswordHasher};
//! use tasklist::db::{MemoryStore, SequenceIdGenerator};
//! use tasklist::{app, AppState, TaskListConfig};
//!
//! let state = AppState::new(
//!     TaskListConfig::default(),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(Argon2PasswordHasher::new()?),
//!     Arc::new(SequenceIdGenerator::starting_after(0)),
//!     TokenCodec::new(secret.as_bytes(), 7200, "tasklist"),
//! );
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8888").await?;
//! axum::serve(listener, app(state)).await?;
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Passwords, credentials, session tokens and middleware
//! - [`cli`] - Command-line interface
//! - [`db`] - Storage backends (libsql/SQLite, in-memory)
//! - [`types`] - Common types and error handling
//! - [`utils`] - TOML configuration

#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication: passwords, credentials, tokens, middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Storage backends for users and tasks.
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use db::{DatabaseClient, MemoryStore, TursoClient};
pub use types::{AppError, Result};
pub use utils::toml_config::TaskListConfig;

use crate::auth::credentials::CredentialVerifier;
use crate::auth::jwt::TokenCodec;
use crate::auth::password::PasswordHasher;
use crate::db::UserIdGenerator;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration resolved at startup
    pub config: Arc<TaskListConfig>,
    /// User and task storage
    pub db: Arc<dyn DatabaseClient>,
    /// Registration and login
    pub credentials: Arc<CredentialVerifier>,
    /// Session token issue and verification
    pub token_codec: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(
        config: TaskListConfig,
        db: Arc<dyn DatabaseClient>,
        hasher: Arc<dyn PasswordHasher>,
        ids: Arc<dyn UserIdGenerator>,
        token_codec: TokenCodec,
    ) -> Self {
        let credentials = Arc::new(CredentialVerifier::new(db.clone(), hasher, ids));

        Self {
            config: Arc::new(config),
            db,
            credentials,
            token_codec: Arc::new(token_codec),
        }
    }
}

/// Liveness check
async fn health() -> &'static str {
    "OK"
}

/// Builds the full HTTP application.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(api::routes::create_router(&state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
