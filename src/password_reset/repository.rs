use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{NewPasswordResetToken, PasswordResetTokenModel};
use crate::shared::AppError;
use crate::user::{repository::UserRepository, USER_NOT_FOUND};

/// Result of trying to consume a reset token
#[derive(Debug, Clone, PartialEq)]
pub enum RedeemResult {
    /// The token was valid, is now marked used and the owner's password is replaced
    Redeemed(PasswordResetTokenModel),
    /// The token does not exist, was already used, or has expired
    Invalid,
}

/// Trait for password reset token storage
#[async_trait]
pub trait PasswordResetRepository {
    async fn create_token(
        &self,
        token: &NewPasswordResetToken,
    ) -> Result<PasswordResetTokenModel, AppError>;

    /// Read-only validity check at `now`. Redemption re-checks, so this only
    /// lets callers skip expensive work for tokens that cannot succeed.
    async fn is_redeemable(&self, token: &str, now: DateTime<Utc>) -> Result<bool, AppError>;

    /// Checks validity at `now`, marks the token used and stores
    /// `password_hash` for its owner as one unit. Either both writes land or
    /// neither does, and at most one caller can ever redeem a given token.
    async fn redeem_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<RedeemResult, AppError>;
}

struct TokenTable {
    rows: HashMap<String, PasswordResetTokenModel>,
    next_id: i64,
}

/// In-memory implementation of PasswordResetRepository for development and testing
///
/// Redemption writes the new hash through `users`, which must be the same
/// store the rest of the application reads accounts from.
pub struct InMemoryPasswordResetRepository {
    table: RwLock<TokenTable>,
    users: Arc<dyn UserRepository + Send + Sync>,
}

impl InMemoryPasswordResetRepository {
    pub fn new(users: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self {
            table: RwLock::new(TokenTable {
                rows: HashMap::new(),
                next_id: 1,
            }),
            users,
        }
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryPasswordResetRepository {
    #[instrument(skip(self, token), fields(user_id = token.user_id))]
    async fn create_token(
        &self,
        token: &NewPasswordResetToken,
    ) -> Result<PasswordResetTokenModel, AppError> {
        let mut table = self.table.write().await;
        if table.rows.contains_key(&token.token) {
            warn!("Generated reset token collided with an existing one");
            return Err(AppError::DatabaseError(
                "duplicate password reset token".to_string(),
            ));
        }

        let id = table.next_id;
        table.next_id += 1;

        let model = PasswordResetTokenModel {
            id,
            user_id: token.user_id,
            token: token.token.clone(),
            expires_at: token.expires_at,
            used: false,
            created_at: Utc::now(),
        };
        table.rows.insert(model.token.clone(), model.clone());

        debug!(token_id = id, "Reset token stored in memory");
        Ok(model)
    }

    #[instrument(skip(self, token))]
    async fn is_redeemable(&self, token: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.get(token).is_some_and(|row| row.is_valid(now)))
    }

    #[instrument(skip(self, token, password_hash))]
    async fn redeem_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<RedeemResult, AppError> {
        // The write lock is held across the password write so no second
        // redeemer can observe the token as valid in between.
        let mut table = self.table.write().await;
        let row = match table.rows.get_mut(token) {
            Some(row) if row.is_valid(now) => row,
            _ => {
                debug!("Reset token missing, used or expired");
                return Ok(RedeemResult::Invalid);
            }
        };

        self.users
            .update_password(row.user_id, password_hash)
            .await?;
        row.used = true;

        debug!(
            token_id = row.id,
            user_id = row.user_id,
            "Reset token redeemed in memory"
        );
        Ok(RedeemResult::Redeemed(row.clone()))
    }
}

/// PostgreSQL implementation of password reset token storage
pub struct PostgresPasswordResetRepository {
    pool: PgPool,
}

impl PostgresPasswordResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordResetRepository for PostgresPasswordResetRepository {
    #[instrument(skip(self, token), fields(user_id = token.user_id))]
    async fn create_token(
        &self,
        token: &NewPasswordResetToken,
    ) -> Result<PasswordResetTokenModel, AppError> {
        // A unique violation here is a token collision, not a duplicate email,
        // so it is reported as a plain database error.
        let model = sqlx::query_as::<_, PasswordResetTokenModel>(
            "INSERT INTO password_reset_tokens (user_id, token, expires_at) VALUES ($1, $2, $3) \
             RETURNING id, user_id, token, expires_at, used, created_at",
        )
        .bind(token.user_id)
        .bind(&token.token)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to store reset token");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(token_id = model.id, "Reset token stored in database");
        Ok(model)
    }

    #[instrument(skip(self, token))]
    async fn is_redeemable(&self, token: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM password_reset_tokens \
             WHERE token = $1 AND used = FALSE AND expires_at > $2)",
        )
        .bind(token)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to look up reset token");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self, token, password_hash))]
    async fn redeem_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<RedeemResult, AppError> {
        let db_error = |e: sqlx::Error| {
            warn!(error = %e, "Failed to redeem reset token");
            AppError::DatabaseError(e.to_string())
        };

        // Dropping the transaction without commit rolls back the token update.
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let redeemed = sqlx::query_as::<_, PasswordResetTokenModel>(
            "UPDATE password_reset_tokens SET used = TRUE \
             WHERE token = $1 AND used = FALSE AND expires_at > $2 \
             RETURNING id, user_id, token, expires_at, used, created_at",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let Some(model) = redeemed else {
            return Ok(RedeemResult::Invalid);
        };

        let updated = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(model.user_id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        if updated.rows_affected() == 0 {
            warn!(user_id = model.user_id, "Reset token owner no longer exists");
            return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
        }

        tx.commit().await.map_err(db_error)?;

        debug!(
            token_id = model.id,
            user_id = model.user_id,
            "Reset token redeemed in database"
        );
        Ok(RedeemResult::Redeemed(model))
    }
}
