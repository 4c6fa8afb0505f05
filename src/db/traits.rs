//! Storage abstraction traits
//!
//! This module provides the `CredentialStore` and `TaskStore` traits that
//! abstract over the storage backends (in-memory, file-based SQLite).
//!
//! # Example
//!
//! ```rust,ignore
//! use tasklist::db::DatabaseProvider;
//!
//! // Use the in-memory store (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let db = DatabaseProvider::SQLite { path: "data.db".into() }.create_client().await?;
//! ```

use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DatabaseProvider {
    /// In-memory store (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database via libsql
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
}

impl DatabaseProvider {
    /// Picks a provider from a configured database URL.
    pub fn from_url(url: &str) -> Self {
        if url.is_empty() || url == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::SQLite {
                path: url.to_string(),
            }
        }
    }

    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<Arc<dyn DatabaseClient>> {
        match self {
            DatabaseProvider::Memory => Ok(Arc::new(super::memory::MemoryStore::new())),
            DatabaseProvider::SQLite { path } => {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            AppError::StoreUnavailable(format!(
                                "Failed to create database directory: {}",
                                e
                            ))
                        })?;
                    }
                }
                let client = super::turso::TursoClient::new_local(path).await?;
                Ok(Arc::new(client))
            }
        }
    }
}

/// User record from the credential store
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    /// Unix timestamp of creation
    pub created_at: i64,
}

/// A user about to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub id: i64,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub display_name: Option<&'a str>,
}

/// Task record, always tagged with its owner
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub status: bool,
    /// Unix timestamp of creation
    pub created_at: i64,
    /// Unix timestamp of last update
    pub updated_at: i64,
}

/// Why a user insert did not happen.
#[derive(Debug, thiserror::Error)]
pub enum InsertUserError {
    /// The unique constraint on `name` rejected the row.
    #[error("user name already taken")]
    DuplicateName,

    /// The identifier is already assigned to another user.
    #[error("user id {0} already assigned")]
    DuplicateId(i64),

    #[error(transparent)]
    Store(#[from] AppError),
}

/// Keyed store of registered users.
///
/// Name uniqueness is enforced by `insert_user` atomically; callers never
/// check for existence first.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a user, failing with `DuplicateName` if the name is taken.
    async fn insert_user(&self, user: NewUser<'_>) -> std::result::Result<(), InsertUserError>;

    /// Get a user by exact (case-sensitive) name
    async fn get_user_by_name(&self, name: &str) -> Result<Option<UserRecord>>;

    /// Get a user by ID
    async fn get_user_by_id(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Highest user id assigned so far, if any
    async fn max_user_id(&self) -> Result<Option<i64>>;
}

/// Owner-scoped task storage. Every operation filters by `owner_id`.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create a task owned by `owner_id`
    async fn create_task(&self, owner_id: i64, title: &str) -> Result<TaskRecord>;

    /// List the owner's live tasks, oldest first
    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<TaskRecord>>;

    /// Get one of the owner's live tasks
    async fn get_task(&self, owner_id: i64, id: i64) -> Result<Option<TaskRecord>>;

    /// Set the status of one of the owner's live tasks; `false` if no such task
    async fn update_task_status(&self, owner_id: i64, id: i64, status: bool) -> Result<bool>;

    /// Soft-delete one of the owner's live tasks; `false` if no such task
    async fn delete_task(&self, owner_id: i64, id: i64) -> Result<bool>;
}

/// A backend serving both users and tasks.
pub trait DatabaseClient: CredentialStore + TaskStore {}

impl<T: CredentialStore + TaskStore> DatabaseClient for T {}
