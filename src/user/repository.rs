use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{
    models::{NewUser, UserModel},
    USER_NOT_FOUND,
};
use crate::database::map_write_error;
use crate::shared::{AppError, DUPLICATE_EMAIL};

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    /// Fails with `AppError::Conflict` when the email is already registered
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    async fn get_user(&self, id: i64) -> Result<Option<UserModel>, AppError>;
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError>;
}

struct UserTable {
    rows: HashMap<i64, UserModel>,
    next_id: i64,
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(UserTable {
                rows: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|row| row.email == user.email) {
            warn!(email = %user.email, "User email already registered in memory");
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let id = table.next_id;
        table.next_id += 1;

        let model = UserModel {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        };
        table.rows.insert(id, model.clone());

        debug!(user_id = id, "User created in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|row| row.email == email).cloned())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> Result<Option<UserModel>, AppError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                debug!(user_id = id, "Password updated in memory");
                Ok(())
            }
            None => {
                warn!(user_id = id, "User not found for password update in memory");
                Err(AppError::NotFound(USER_NOT_FOUND.to_string()))
            }
        }
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        let model = sqlx::query_as::<_, UserModel>(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, name, email, password_hash",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create user in database");
            map_write_error(e)
        })?;

        debug!(user_id = model.id, "User created in database");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to look up user by email");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> Result<Option<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT id, name, email, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = id, "Failed to fetch user from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = id, "Failed to update password in database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(user_id = id, "User not found for password update");
            return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
        }

        debug!(user_id = id, "Password updated in database");
        Ok(())
    }
}
