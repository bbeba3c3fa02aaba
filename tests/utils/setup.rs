#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::Router;
use std::sync::Arc;

use employee_directory::{
    create_router,
    employee::repository::{EmployeeRepository, InMemoryEmployeeRepository},
    password_reset::repository::InMemoryPasswordResetRepository,
    user::repository::InMemoryUserRepository,
    AppState, PasswordHasher, PasswordResetConfig, TokenConfig,
};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub employee_repository: Arc<dyn EmployeeRepository + Send + Sync>,
    pub token_config: TokenConfig,
}

pub struct TestSetupBuilder {
    employee_repository: Option<Arc<dyn EmployeeRepository + Send + Sync>>,
    reset_config: PasswordResetConfig,
    jwt_ttl_seconds: i64,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            employee_repository: None,
            reset_config: PasswordResetConfig::default(),
            jwt_ttl_seconds: 3600,
        }
    }

    pub fn with_employee_repository(
        mut self,
        repo: Arc<dyn EmployeeRepository + Send + Sync>,
    ) -> Self {
        self.employee_repository = Some(repo);
        self
    }

    pub fn with_reset_config(mut self, config: PasswordResetConfig) -> Self {
        self.reset_config = config;
        self
    }

    pub fn with_jwt_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.jwt_ttl_seconds = ttl_seconds;
        self
    }

    pub fn build(self) -> TestSetup {
        let employee_repository = self
            .employee_repository
            .unwrap_or_else(|| Arc::new(InMemoryEmployeeRepository::new()));
        let token_config = TokenConfig::new(TEST_JWT_SECRET, self.jwt_ttl_seconds);
        let user_repository = Arc::new(InMemoryUserRepository::new());

        let app_state = AppState::new(
            Arc::clone(&employee_repository),
            user_repository.clone(),
            Arc::new(InMemoryPasswordResetRepository::new(user_repository)),
            token_config.clone(),
            // Minimum Argon2 cost keeps debug-build tests fast
            PasswordHasher::with_cost(8, 1, 1).unwrap(),
            self.reset_config,
        );

        TestSetup {
            app: create_router(app_state),
            employee_repository,
            token_config,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
