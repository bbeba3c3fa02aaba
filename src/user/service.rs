use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{NewUser, UserModel},
    repository::UserRepository,
    types::{LoginCredentials, LoginResponse, RegisterUser},
};
use crate::auth::{PasswordHasher, TokenConfig};
use crate::shared::{AppError, DUPLICATE_EMAIL};

pub const UNKNOWN_EMAIL: &str = "No user found for this email";
pub const INCORRECT_PASSWORD: &str = "Incorrect password";

/// Service for registration and login
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    password_hasher: PasswordHasher,
    token_config: TokenConfig,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        password_hasher: PasswordHasher,
        token_config: TokenConfig,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            token_config,
        }
    }

    /// Stores a new user with a salted hash of the password
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: RegisterUser) -> Result<UserModel, AppError> {
        if self
            .repository
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            warn!("Registration for an email that already exists");
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let password_hash = self
            .password_hasher
            .hash_async(&registration.password)
            .await?;
        let user = self
            .repository
            .create_user(&NewUser {
                name: registration.name,
                email: registration.email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "User registered successfully");
        Ok(user)
    }

    /// Verifies credentials and issues a signed token
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: LoginCredentials) -> Result<LoginResponse, AppError> {
        let user = self
            .repository
            .find_by_email(&credentials.email)
            .await?
            .ok_or_else(|| {
                warn!("Login attempt for unknown email");
                AppError::Unauthorized(UNKNOWN_EMAIL.to_string())
            })?;

        if !self
            .password_hasher
            .verify_async(&user.password_hash, &credentials.password)
            .await
        {
            warn!(user_id = user.id, "Login attempt with incorrect password");
            return Err(AppError::Unauthorized(INCORRECT_PASSWORD.to_string()));
        }

        let token = self
            .token_config
            .create_token(user.id, &user.name, &user.email)?;

        info!(user_id = user.id, "User logged in successfully");
        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token,
            user: user.into(),
        })
    }
}
