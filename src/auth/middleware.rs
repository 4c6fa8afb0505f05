use crate::auth::jwt::TokenCodec;
use crate::types::{AppError, Identity, Result};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Binds the bearer token's identity to the request.
///
/// Rejects with the envelope and skips the downstream handler when the
/// header is missing, malformed, or carries an invalid token.
pub async fn auth_middleware(
    State(codec): State<Arc<TokenCodec>>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = extract_bearer(req.headers())?;

    let identity = codec.verify(token, Utc::now()).map_err(|e| {
        debug!(reason = %e, "rejected bearer token");
        AppError::InvalidToken(e)
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str> {
    let value = match headers.get(header::AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AppError::MissingToken),
    };

    let value = value.to_str().map_err(|_| AppError::MalformedHeader)?;

    match value.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() => Ok(token),
        _ => Err(AppError::MalformedHeader),
    }
}

/// Extractor for the identity bound by [`auth_middleware`].
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::MissingToken)
    }
}
