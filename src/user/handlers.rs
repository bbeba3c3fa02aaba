use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::UserService,
    types::{LoginCredentials, LoginResponse, RegisterUser},
};
use crate::shared::{AppError, AppState, MessageResponse};

fn user_service(state: &AppState) -> UserService {
    UserService::new(
        Arc::clone(&state.user_repository),
        state.password_hasher.clone(),
        state.token_config.clone(),
    )
}

/// HTTP handler for user registration
///
/// POST /register
#[instrument(name = "register", skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;
    let registration = RegisterUser::from_json(&payload)?;

    user_service(&state).register(registration).await?;

    Ok(Json(MessageResponse::new("User registered")))
}

/// HTTP handler for login
///
/// POST /login
/// Returns a signed JWT plus the user's public fields
#[instrument(name = "login", skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;
    let credentials = LoginCredentials::from_json(&payload)?;

    let response = user_service(&state).login(credentials).await?;

    Ok(Json(response))
}

/// POST /logout
///
/// Tokens are stateless, so there is nothing to revoke server side.
#[instrument(name = "logout")]
pub async fn logout() -> Json<MessageResponse> {
    info!("Logout requested");
    Json(MessageResponse::new("Logout successful"))
}
