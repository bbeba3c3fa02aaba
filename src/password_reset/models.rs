use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the password_reset_tokens table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct PasswordResetTokenModel {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetTokenModel {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// A token can be redeemed only once and only before it expires
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.is_expired(now)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPasswordResetToken {
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
