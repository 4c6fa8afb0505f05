//! HTTP API Handlers and Routes
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Authentication
//! - `POST /register` - Register a new user
//! - `POST /login` - Login and receive a session token
//!
//! ## Tasks (`/api/v1/todo`)
//! - `POST /api/v1/todo` - Create a task
//! - `GET /api/v1/todo` - List the caller's tasks
//! - `PUT /api/v1/todo` - Set a task's status
//! - `DELETE /api/v1/todo/{id}` - Delete a task
//! - `GET /api/v1/me` - The authenticated identity
//!
//! ## Health
//! - `GET /health` - Liveness check
//!
//! # Responses
//!
//! Every endpoint answers HTTP 200 with `{"code": 0|1, "msg": ..., "data": ...}`.
//! Protected endpoints require:
//! ```text
//! Authorization: Bearer <token>
//! ```

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
