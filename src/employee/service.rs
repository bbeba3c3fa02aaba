use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::EmployeeModel,
    repository::EmployeeRepository,
    types::{EmployeeChanges, EmployeeResponse, NewEmployee},
    EMPLOYEE_NOT_FOUND,
};
use crate::shared::{AppError, DUPLICATE_EMAIL};

/// Employees inserted into an empty directory at startup
const SAMPLE_EMPLOYEES: [(&str, &str, &str, &str); 5] = [
    ("Alice Smith", "alice@example.com", "HR", "1234567890"),
    ("Bob Johnson", "bob@example.com", "IT", "2345678901"),
    ("Charlie Lee", "charlie@example.com", "Finance", "3456789012"),
    ("Diana King", "diana@example.com", "Marketing", "4567890123"),
    ("Evan Wright", "evan@example.com", "Sales", "5678901234"),
];

/// Service for handling employee business logic
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository + Send + Sync>,
}

impl EmployeeService {
    pub fn new(repository: Arc<dyn EmployeeRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn list_employees(&self) -> Result<Vec<EmployeeResponse>, AppError> {
        let employees = self.repository.list_employees().await?;
        info!(employee_count = employees.len(), "Employees retrieved successfully");

        Ok(employees.into_iter().map(EmployeeResponse::from).collect())
    }

    /// Loads an employee or fails with 404 "Employee not found"
    #[instrument(skip(self))]
    pub async fn find_employee(&self, id: i64) -> Result<EmployeeModel, AppError> {
        self.repository.get_employee(id).await?.ok_or_else(|| {
            debug!(employee_id = id, "Employee lookup missed");
            AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string())
        })
    }

    /// Inserts a new employee after checking the email is free.
    ///
    /// The lookup is only a pre-check; the repository rejects a duplicate
    /// that slips in between the check and the insert.
    #[instrument(skip(self, employee), fields(email = %employee.email))]
    pub async fn create_employee(&self, employee: NewEmployee) -> Result<EmployeeModel, AppError> {
        if self.repository.find_by_email(&employee.email).await?.is_some() {
            warn!("Employee email already exists");
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let created = self.repository.create_employee(&employee).await?;
        info!(employee_id = created.id, "Employee created successfully");
        Ok(created)
    }

    /// Persists the fields present in `changes` for an already loaded
    /// employee and returns the stored row
    #[instrument(skip(self, employee, changes), fields(employee_id = employee.id))]
    pub async fn update_employee(
        &self,
        employee: EmployeeModel,
        changes: EmployeeChanges,
    ) -> Result<EmployeeModel, AppError> {
        if changes.is_empty() {
            debug!("Update carried no fields, nothing to persist");
            return Ok(employee);
        }

        if let Some(email) = changes.email.as_deref().filter(|e| *e != employee.email) {
            if let Some(holder) = self.repository.find_by_email(email).await? {
                if holder.id != employee.id {
                    warn!(holder_id = holder.id, "Email already held by another employee");
                    return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
                }
            }
        }

        let updated = self.repository.update_employee(employee.id, &changes).await?;

        info!("Employee updated successfully");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_employee(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete_employee(id).await?;
        info!(employee_id = id, "Employee deleted successfully");
        Ok(())
    }

    /// Seeds the sample employees when the directory is empty.
    /// Returns how many rows were inserted.
    #[instrument(skip(self))]
    pub async fn seed_sample_employees(&self) -> Result<usize, AppError> {
        if self.repository.count_employees().await? > 0 {
            debug!("Employee table not empty, skipping sample data");
            return Ok(0);
        }

        for (name, email, department, phone) in SAMPLE_EMPLOYEES {
            self.repository
                .create_employee(&NewEmployee {
                    name: name.to_string(),
                    email: email.to_string(),
                    department: department.to_string(),
                    phone: phone.to_string(),
                })
                .await?;
        }

        info!(seeded = SAMPLE_EMPLOYEES.len(), "Sample employees inserted");
        Ok(SAMPLE_EMPLOYEES.len())
    }
}
