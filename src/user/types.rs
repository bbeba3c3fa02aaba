use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::models::UserModel;
use crate::validation::{PayloadReader, ValidationErrors, NAME_MAX_LENGTH};

/// Validated registration payload, password still in plaintext
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterUser {
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(payload)?;

        let name = reader.required_text("name", NAME_MAX_LENGTH);
        let email = reader.required_email("email");
        let password = reader.required_password("password");

        reader.finish(|| {
            Some(Self {
                name: name?,
                email: email?,
                password: password?,
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(payload)?;

        let email = reader.required_email("email");
        let password = reader.required_password("password");

        reader.finish(|| {
            Some(Self {
                email: email?,
                password: password?,
            })
        })
    }
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<UserModel> for UserSummary {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}

/// Response structure for a successful login
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub message: String,
    pub token: String, // Signed JWT for the Authorization header
    pub user: UserSummary,
}
