//! Authentication for the task list API.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Password digests (Argon2id, keyed SHA-256)
//! - [`auth::credentials`](crate::auth::credentials) - Registration and login
//! - [`auth::jwt`](crate::auth::jwt) - Session token issue and verification
//! - [`auth::middleware`](crate::auth::middleware) - Axum middleware and the `AuthUser` extractor
//!
//! # Flow
//!
//! 1. `POST /register` stores a digest of the password under a fresh user id.
//! 2. `POST /login` checks the password and returns an HS256 token carrying
//!    the user id and name.
//! 3. Protected routes pass through [`middleware::auth_middleware`], which
//!    verifies the token and binds an [`Identity`](crate::types::Identity) to
//!    the request:
//!
//! ```ignore
//! async fn me(AuthUser(identity): AuthUser) -> ApiResponse<Identity> {
//!     ApiResponse::success("success", identity)
//! }
//! ```
//!
//! Tokens are stateless. There is no revocation; a token stops working only
//! when it expires.

/// Registration and login.
pub mod credentials;
/// Session token encoding and verification.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing schemes.
pub mod password;
