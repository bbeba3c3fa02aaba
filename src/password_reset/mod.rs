// Public API - what other modules can use
pub use handlers::{request_password_reset, reset_password};
pub use service::PasswordResetService;

// Internal modules
pub mod generators;
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;

pub const INVALID_RESET_TOKEN: &str = "Invalid or expired token";

/// Settings for issuing reset tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PasswordResetConfig {
    pub token_ttl_minutes: i64,
    /// Echo the token in the request response. Development only, since it
    /// stands in for the email a real deployment would send.
    pub expose_token: bool,
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        Self {
            token_ttl_minutes: 60,
            expose_token: true,
        }
    }
}
