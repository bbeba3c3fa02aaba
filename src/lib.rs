// Library crate for the employee directory service
// This file exposes the public API for the binary and integration tests

pub mod auth;
pub mod config;
pub mod database;
pub mod employee;
pub mod password_reset;
pub mod router;
pub mod shared;
pub mod user;
pub mod validation;

// Re-export commonly used types for easier access in tests
pub use auth::{Claims, PasswordHasher, TokenConfig};
pub use config::{AppConfig, Environment};
pub use employee::{models::EmployeeModel, repository::EmployeeRepository, EmployeeService};
pub use password_reset::PasswordResetConfig;
pub use router::create_router;
pub use shared::{AppError, AppState};
