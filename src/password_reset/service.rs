use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::{
    generators::{RandomTokenGenerator, ResetTokenGenerator},
    models::NewPasswordResetToken,
    repository::{PasswordResetRepository, RedeemResult},
    types::{ResetPassword, ResetRequest, ResetRequestResponse},
    PasswordResetConfig, INVALID_RESET_TOKEN,
};
use crate::auth::PasswordHasher;
use crate::shared::AppError;
use crate::user::{repository::UserRepository, USER_NOT_FOUND};

/// Service for issuing and redeeming password reset tokens
pub struct PasswordResetService {
    reset_repository: Arc<dyn PasswordResetRepository + Send + Sync>,
    user_repository: Arc<dyn UserRepository + Send + Sync>,
    password_hasher: PasswordHasher,
    token_generator: Arc<dyn ResetTokenGenerator>,
    config: PasswordResetConfig,
}

impl PasswordResetService {
    pub fn new(
        reset_repository: Arc<dyn PasswordResetRepository + Send + Sync>,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        password_hasher: PasswordHasher,
        config: PasswordResetConfig,
    ) -> Self {
        Self {
            reset_repository,
            user_repository,
            password_hasher,
            token_generator: Arc::new(RandomTokenGenerator::new()),
            config,
        }
    }

    /// Replaces the random token source, for deterministic tests
    pub fn with_generator(mut self, generator: Arc<dyn ResetTokenGenerator>) -> Self {
        self.token_generator = generator;
        self
    }

    /// Issues a reset token for the user owning `request.email`
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn request_reset(
        &self,
        request: ResetRequest,
    ) -> Result<ResetRequestResponse, AppError> {
        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Password reset requested for unknown email");
                AppError::NotFound(USER_NOT_FOUND.to_string())
            })?;

        let token = self.token_generator.generate().await;
        let ttl_minutes = self.config.token_ttl_minutes;
        let expires_at = Duration::try_minutes(ttl_minutes)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                error!(ttl_minutes, "Reset token lifetime is out of range");
                AppError::Internal
            })?;
        let stored = self
            .reset_repository
            .create_token(&NewPasswordResetToken {
                user_id: user.id,
                token,
                expires_at,
            })
            .await?;

        info!(
            user_id = user.id,
            token_id = stored.id,
            expires_at = %stored.expires_at,
            "Password reset token issued"
        );

        Ok(ResetRequestResponse {
            message: "Password reset email sent".to_string(),
            token: self.config.expose_token.then_some(stored.token),
        })
    }

    /// Consumes a reset token and replaces the owner's password hash.
    ///
    /// The token is only marked used if the new hash is stored with it.
    #[instrument(skip(self, reset))]
    pub async fn reset_password(&self, reset: ResetPassword) -> Result<(), AppError> {
        if !self
            .reset_repository
            .is_redeemable(&reset.token, Utc::now())
            .await?
        {
            return Err(invalid_token());
        }

        let password_hash = self.password_hasher.hash_async(&reset.password).await?;

        match self
            .reset_repository
            .redeem_token(&reset.token, Utc::now(), &password_hash)
            .await?
        {
            RedeemResult::Redeemed(token) => {
                info!(user_id = token.user_id, "Password reset successfully");
                Ok(())
            }
            RedeemResult::Invalid => Err(invalid_token()),
        }
    }
}

fn invalid_token() -> AppError {
    warn!("Password reset attempted with an invalid or expired token");
    AppError::BadRequest(INVALID_RESET_TOKEN.to_string())
}
