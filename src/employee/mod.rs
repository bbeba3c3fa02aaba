// Public API - what other modules can use
pub use handlers::{create_employee, delete_employee, get_employee, list_employees, update_employee};
pub use service::EmployeeService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;

pub const EMPLOYEE_NOT_FOUND: &str = "Employee not found";
