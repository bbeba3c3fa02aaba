use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{
    models::EmployeeModel,
    types::{EmployeeChanges, NewEmployee},
    EMPLOYEE_NOT_FOUND,
};
use crate::database::map_write_error;
use crate::shared::{AppError, DUPLICATE_EMAIL};

/// Trait for employee repository operations
///
/// Implementations are the authority on email uniqueness: `create_employee`
/// and `update_employee` fail with `AppError::Conflict` when another row
/// already holds the email.
#[async_trait]
pub trait EmployeeRepository {
    async fn create_employee(&self, employee: &NewEmployee) -> Result<EmployeeModel, AppError>;
    async fn get_employee(&self, id: i64) -> Result<Option<EmployeeModel>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<EmployeeModel>, AppError>;
    async fn list_employees(&self) -> Result<Vec<EmployeeModel>, AppError>;
    /// Writes only the fields present in `changes` and returns the stored row
    async fn update_employee(
        &self,
        id: i64,
        changes: &EmployeeChanges,
    ) -> Result<EmployeeModel, AppError>;
    async fn delete_employee(&self, id: i64) -> Result<(), AppError>;
    async fn count_employees(&self) -> Result<u64, AppError>;
}

struct EmployeeTable {
    rows: BTreeMap<i64, EmployeeModel>,
    next_id: i64,
}

impl EmployeeTable {
    fn email_taken(&self, email: &str, except_id: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|row| row.email == email && Some(row.id) != except_id)
    }
}

/// In-memory implementation of EmployeeRepository for development and testing
///
/// Uniqueness checks and writes happen under one write lock, so concurrent
/// writers cannot both claim the same email.
pub struct InMemoryEmployeeRepository {
    table: RwLock<EmployeeTable>,
}

impl Default for InMemoryEmployeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEmployeeRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            table: RwLock::new(EmployeeTable {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    #[instrument(skip(self, employee))]
    async fn create_employee(&self, employee: &NewEmployee) -> Result<EmployeeModel, AppError> {
        debug!(email = %employee.email, "Creating employee in memory");

        let mut table = self.table.write().await;
        if table.email_taken(&employee.email, None) {
            warn!(email = %employee.email, "Employee email already exists in memory");
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let id = table.next_id;
        table.next_id += 1;

        let model = EmployeeModel {
            id,
            name: employee.name.clone(),
            email: employee.email.clone(),
            department: employee.department.clone(),
            phone: employee.phone.clone(),
        };
        table.rows.insert(id, model.clone());

        debug!(employee_id = id, "Employee created successfully in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_employee(&self, id: i64) -> Result<Option<EmployeeModel>, AppError> {
        debug!(employee_id = id, "Fetching employee from memory");
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<EmployeeModel>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|row| row.email == email).cloned())
    }

    #[instrument(skip(self))]
    async fn list_employees(&self) -> Result<Vec<EmployeeModel>, AppError> {
        let table = self.table.read().await;
        let employees: Vec<EmployeeModel> = table.rows.values().cloned().collect();

        debug!(employee_count = employees.len(), "Employees listed from memory");
        Ok(employees)
    }

    #[instrument(skip(self, changes))]
    async fn update_employee(
        &self,
        id: i64,
        changes: &EmployeeChanges,
    ) -> Result<EmployeeModel, AppError> {
        debug!(employee_id = id, "Updating employee in memory");

        let mut table = self.table.write().await;
        if let Some(email) = changes.email.as_deref() {
            if table.email_taken(email, Some(id)) {
                warn!(employee_id = id, email = %email, "Email held by another employee");
                return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
            }
        }
        let Some(row) = table.rows.get_mut(&id) else {
            warn!(employee_id = id, "Employee not found for update in memory");
            return Err(AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()));
        };
        row.apply(changes);

        debug!(employee_id = id, "Employee updated successfully in memory");
        Ok(row.clone())
    }

    #[instrument(skip(self))]
    async fn delete_employee(&self, id: i64) -> Result<(), AppError> {
        debug!(employee_id = id, "Deleting employee from memory");

        let mut table = self.table.write().await;
        if table.rows.remove(&id).is_none() {
            warn!(employee_id = id, "Employee not found for deletion in memory");
            return Err(AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()));
        }

        debug!(employee_id = id, "Employee deleted successfully from memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_employees(&self) -> Result<u64, AppError> {
        Ok(self.table.read().await.rows.len() as u64)
    }
}

/// PostgreSQL implementation of employee repository
pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    #[instrument(skip(self, employee))]
    async fn create_employee(&self, employee: &NewEmployee) -> Result<EmployeeModel, AppError> {
        debug!(email = %employee.email, "Creating employee in database");

        let model = sqlx::query_as::<_, EmployeeModel>(
            "INSERT INTO employees (name, email, department, phone) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, department, phone",
        )
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.department)
        .bind(&employee.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create employee in database");
            map_write_error(e)
        })?;

        debug!(employee_id = model.id, "Employee created successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_employee(&self, id: i64) -> Result<Option<EmployeeModel>, AppError> {
        debug!(employee_id = id, "Fetching employee from database");

        sqlx::query_as::<_, EmployeeModel>(
            "SELECT id, name, email, department, phone FROM employees WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, employee_id = id, "Failed to fetch employee from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<EmployeeModel>, AppError> {
        sqlx::query_as::<_, EmployeeModel>(
            "SELECT id, name, email, department, phone FROM employees WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to look up employee by email");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn list_employees(&self) -> Result<Vec<EmployeeModel>, AppError> {
        let employees = sqlx::query_as::<_, EmployeeModel>(
            "SELECT id, name, email, department, phone FROM employees ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list employees");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!(employee_count = employees.len(), "Employees listed from database");
        Ok(employees)
    }

    #[instrument(skip(self, changes))]
    async fn update_employee(
        &self,
        id: i64,
        changes: &EmployeeChanges,
    ) -> Result<EmployeeModel, AppError> {
        debug!(employee_id = id, "Updating employee in database");

        // Absent fields bind NULL and keep the current column value, so
        // concurrent updates to different fields do not overwrite each other.
        let updated = sqlx::query_as::<_, EmployeeModel>(
            "UPDATE employees SET \
             name = COALESCE($2, name), \
             email = COALESCE($3, email), \
             department = COALESCE($4, department), \
             phone = COALESCE($5, phone) \
             WHERE id = $1 \
             RETURNING id, name, email, department, phone",
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.department.as_deref())
        .bind(changes.phone.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, employee_id = id, "Failed to update employee in database");
            map_write_error(e)
        })?;

        let Some(model) = updated else {
            warn!(employee_id = id, "Employee not found for update");
            return Err(AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()));
        };

        debug!(employee_id = id, "Employee updated successfully in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn delete_employee(&self, id: i64) -> Result<(), AppError> {
        debug!(employee_id = id, "Deleting employee from database");

        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, employee_id = id, "Failed to delete employee from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(employee_id = id, "Employee not found for deletion");
            return Err(AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()));
        }

        debug!(employee_id = id, "Employee deleted successfully from database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_employees(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to count employees");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(count.max(0) as u64)
    }
}
