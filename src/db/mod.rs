//! Storage backends for users and tasks.
//!
//! This module provides:
//! - **Traits**: [`CredentialStore`] and [`TaskStore`], injected into the
//!   credential verifier and the task handlers
//! - **libsql/SQLite**: [`TursoClient`], the persistent backend
//! - **Memory**: [`MemoryStore`], an ephemeral backend for development and tests
//! - **Identifiers**: pluggable user id generators

pub mod ids;
pub mod memory;
pub mod traits;
pub mod turso;

// Re-exports
pub use ids::{SequenceIdGenerator, SnowflakeIdGenerator, UserIdGenerator};
pub use memory::MemoryStore;
pub use traits::{
    CredentialStore, DatabaseClient, DatabaseProvider, InsertUserError, NewUser, TaskRecord,
    TaskStore, UserRecord,
};
pub use turso::TursoClient;
