use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error, instrument};

use super::{middleware::INVALID_TOKEN, types::Claims};
use crate::shared::AppError;

pub const DEFAULT_TTL_SECONDS: i64 = 3600;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub ttl_seconds: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
        }
    }

    /// Creates a signed HS256 token for the given user, expiring `ttl_seconds` from now
    #[instrument(skip(self, name, email))]
    pub fn create_token(&self, user_id: i64, name: &str, email: &str) -> Result<String, AppError> {
        let exp = Duration::try_seconds(self.ttl_seconds)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                error!(ttl_seconds = self.ttl_seconds, "Token lifetime is out of range");
                AppError::Internal
            })?
            .timestamp() as usize;

        debug!(
            ttl_seconds = self.ttl_seconds,
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = Claims {
            user_id,
            name: name.to_string(),
            email: email.to_string(),
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates signature and expiry, returning the embedded claims.
    ///
    /// Expiry is checked without leeway: a token is rejected as soon as
    /// `exp` has passed.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        debug!("Decoding and validating JWT token");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| {
            debug!(
                user_id = data.claims.user_id,
                exp = data.claims.exp,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::Unauthorized(INVALID_TOKEN.to_string())
        })
    }
}
