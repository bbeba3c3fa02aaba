use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{PayloadReader, ValidationErrors};

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const TOKEN_AND_PASSWORD_REQUIRED: &str = "Token and password are required";

/// Validated body of a reset request
#[derive(Debug, Clone, PartialEq)]
pub struct ResetRequest {
    pub email: String,
}

impl ResetRequest {
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(payload)?;
        let email = reader.present_text("email", EMAIL_REQUIRED);

        reader.finish(|| Some(Self { email: email? }))
    }
}

/// Validated body of a password reset
#[derive(Debug, Clone, PartialEq)]
pub struct ResetPassword {
    pub token: String,
    pub password: String,
}

impl ResetPassword {
    /// Presence of both fields is checked first and reported as a single
    /// violation; the password strength rule only applies once both are there.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut presence = PayloadReader::new(payload)?;
        let token = presence.present_text("token", TOKEN_AND_PASSWORD_REQUIRED);
        let password = presence.present_text("password", TOKEN_AND_PASSWORD_REQUIRED);
        let token = match (token, password) {
            (Some(token), Some(_)) => token,
            (None, _) => {
                return Err(ValidationErrors::single("token", TOKEN_AND_PASSWORD_REQUIRED))
            }
            (Some(_), None) => {
                return Err(ValidationErrors::single("password", TOKEN_AND_PASSWORD_REQUIRED))
            }
        };

        let mut reader = PayloadReader::new(payload)?;
        let password = reader.required_password("password");
        reader.finish(|| {
            Some(Self {
                token,
                password: password?,
            })
        })
    }
}

/// Response for a reset request
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ResetRequestResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>, // Only present when tokens are exposed (development)
}
