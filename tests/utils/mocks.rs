use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use employee_directory::{
    employee::{
        models::EmployeeModel,
        repository::InMemoryEmployeeRepository,
        types::{EmployeeChanges, NewEmployee},
    },
    AppError, EmployeeRepository,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// In-memory employee store that counts every call reaching it
pub struct RecordingEmployeeRepository {
    inner: InMemoryEmployeeRepository,
    calls: AtomicUsize,
}

impl RecordingEmployeeRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryEmployeeRepository::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmployeeRepository for RecordingEmployeeRepository {
    async fn create_employee(&self, employee: &NewEmployee) -> Result<EmployeeModel, AppError> {
        self.record();
        self.inner.create_employee(employee).await
    }

    async fn get_employee(&self, id: i64) -> Result<Option<EmployeeModel>, AppError> {
        self.record();
        self.inner.get_employee(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<EmployeeModel>, AppError> {
        self.record();
        self.inner.find_by_email(email).await
    }

    async fn list_employees(&self) -> Result<Vec<EmployeeModel>, AppError> {
        self.record();
        self.inner.list_employees().await
    }

    async fn update_employee(
        &self,
        id: i64,
        changes: &EmployeeChanges,
    ) -> Result<EmployeeModel, AppError> {
        self.record();
        self.inner.update_employee(id, changes).await
    }

    async fn delete_employee(&self, id: i64) -> Result<(), AppError> {
        self.record();
        self.inner.delete_employee(id).await
    }

    async fn count_employees(&self) -> Result<u64, AppError> {
        self.record();
        self.inner.count_employees().await
    }
}
