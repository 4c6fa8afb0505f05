use crate::{
    types::{ApiResponse, AppJson, LoginRequest, RegisterRequest, Result},
    AppState,
};
use axum::extract::State;
use chrono::Utc;

/// Register a new user
///
/// `{code:0, msg:"registered"}` on success. A taken name answers with the
/// generic registration failure.
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<ApiResponse> {
    state
        .credentials
        .register(
            &payload.name,
            &payload.password,
            payload.display_name.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok("registered"))
}

/// Login with name and password
///
/// The session token is returned as `data`.
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<ApiResponse<String>> {
    let identity = state
        .credentials
        .login(&payload.name, &payload.password)
        .await?;

    let token = state.token_codec.issue(&identity, Utc::now())?;

    Ok(ApiResponse::success("success", token))
}
