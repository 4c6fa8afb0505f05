//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (login, register).
pub mod auth;
/// Owner-scoped task CRUD handlers.
pub mod tasks;
