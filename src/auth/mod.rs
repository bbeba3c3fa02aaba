// Public API - what other modules can use
pub use middleware::{require_auth, INVALID_TOKEN, MISSING_TOKEN};
pub use password::PasswordHasher;
pub use token::{TokenConfig, DEFAULT_TTL_SECONDS};
pub use types::Claims;

// Internal modules
mod middleware;
mod password;
mod token;
mod types;
