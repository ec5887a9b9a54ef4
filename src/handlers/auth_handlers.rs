use crate::error::Result;
use crate::handlers::json_body;
use crate::models::{LoginPayload, MessageResponse, RegisterPayload, TokenResponse};
use crate::services::{CreateUserRequest, LoginRequest};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

pub async fn register_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let payload = json_body(payload)?;

    let request = CreateUserRequest {
        email: payload.email.unwrap_or_default(),
        password: payload.password.unwrap_or_default(),
    };
    state.user_service.create_user(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

/// Missing fields are treated like wrong ones: 401 with the generic message.
pub async fn login_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let payload = json_body(payload)?;

    let request = LoginRequest {
        email: payload.email.unwrap_or_default(),
        password: payload.password.unwrap_or_default(),
    };
    let access_token = state.auth_service.login(request).await?;

    Ok(Json(TokenResponse { access_token }))
}
