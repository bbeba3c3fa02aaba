// Public API - what other modules can use
pub use handlers::{login, logout, register};
pub use service::UserService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;

pub const USER_NOT_FOUND: &str = "User not found";
