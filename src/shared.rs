use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::auth::{PasswordHasher, TokenConfig};
use crate::config::AppConfig;
use crate::employee::repository::{
    EmployeeRepository, InMemoryEmployeeRepository, PostgresEmployeeRepository,
};
use crate::password_reset::repository::{
    InMemoryPasswordResetRepository, PasswordResetRepository, PostgresPasswordResetRepository,
};
use crate::password_reset::PasswordResetConfig;
use crate::user::repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
use crate::validation::ValidationErrors;

/// Message returned when an email is already taken, for employees and users alike
pub const DUPLICATE_EMAIL: &str = "User already exists";

/// Message returned for failures that must not leak internal detail
pub const GENERIC_FAILURE: &str = "Unable to process request";

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub employee_repository: Arc<dyn EmployeeRepository + Send + Sync>,
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub reset_repository: Arc<dyn PasswordResetRepository + Send + Sync>,
    pub token_config: TokenConfig,
    pub password_hasher: PasswordHasher,
    pub reset_config: PasswordResetConfig,
}

impl AppState {
    pub fn new(
        employee_repository: Arc<dyn EmployeeRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        reset_repository: Arc<dyn PasswordResetRepository + Send + Sync>,
        token_config: TokenConfig,
        password_hasher: PasswordHasher,
        reset_config: PasswordResetConfig,
    ) -> Self {
        Self {
            employee_repository,
            user_repository,
            reset_repository,
            token_config,
            password_hasher,
            reset_config,
        }
    }

    /// State backed by process memory; data is lost on restart
    pub fn in_memory(config: &AppConfig) -> Self {
        let users: Arc<dyn UserRepository + Send + Sync> = Arc::new(InMemoryUserRepository::new());
        Self::new(
            Arc::new(InMemoryEmployeeRepository::new()),
            users.clone(),
            Arc::new(InMemoryPasswordResetRepository::new(users)),
            config.token_config(),
            PasswordHasher::new(),
            config.reset_config(),
        )
    }

    /// State backed by PostgreSQL through a shared connection pool
    pub fn postgres(pool: PgPool, config: &AppConfig) -> Self {
        Self::new(
            Arc::new(PostgresEmployeeRepository::new(pool.clone())),
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresPasswordResetRepository::new(pool)),
            config.token_config(),
            PasswordHasher::new(),
            config.reset_config(),
        )
    }
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": errors.to_string(),
                    "details": errors,
                }),
            ),
            AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::JwtError(msg) | AppError::DatabaseError(msg) => {
                error!(detail = %msg, "Request failed with an unexpected error");
                (StatusCode::BAD_REQUEST, json!({ "error": GENERIC_FAILURE }))
            }
            AppError::Internal => {
                error!("Request failed with an internal error");
                (StatusCode::BAD_REQUEST, json!({ "error": GENERIC_FAILURE }))
            }
        };

        (status, Json(body)).into_response()
    }
}
