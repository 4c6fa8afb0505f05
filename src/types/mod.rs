use crate::auth::jwt::TokenError;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

// ============= API Request/Response Types =============

/// Uniform response envelope: `code` 0 on success, 1 on any failure.
///
/// Every endpoint answers with HTTP 200 and this body, including
/// authorization failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub code: i32,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(msg: impl Into<String>, data: T) -> Self {
        Self {
            code: 0,
            msg: msg.into(),
            data: Some(data),
        }
    }

    pub fn ok(msg: impl Into<String>) -> Self {
        Self {
            code: 0,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            code: 1,
            msg: msg.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        axum::Json(self).into_response()
    }
}

/// JSON body extractor whose rejection is rendered through [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

// ============= Task Types =============

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub id: i64,
    pub status: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub status: bool,
    /// RFC3339 formatted creation timestamp
    pub created_at: String,
    /// RFC3339 formatted last update timestamp
    pub updated_at: String,
}

// ============= Authentication Types =============

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The authenticated caller, bound to a request by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub name: String,
}

/// Signed claim set carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub uid: i64,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User name already exists")]
    DuplicateName,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed authorization header")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message shown to the caller. Never carries internal detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) | AppError::NotFound(_) => "invalid parameters",
            AppError::DuplicateName => "registration failed",
            AppError::InvalidCredentials => "invalid name or password",
            AppError::StoreUnavailable(_) | AppError::Internal(_) => {
                "server busy, please try again later"
            }
            AppError::MissingToken => "empty bearer token in request header",
            AppError::MalformedHeader => "malformed bearer authorization header",
            AppError::InvalidToken(_) => "invalid token",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::StoreUnavailable(detail) | AppError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
            }
            AppError::InvalidInput(detail) | AppError::NotFound(detail) => {
                tracing::debug!(reason = %detail, "request rejected");
            }
            _ => {}
        }

        ApiResponse::<()>::failure(self.public_message()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
