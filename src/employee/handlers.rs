use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::EmployeeService,
    types::{EmployeeChanges, EmployeeCreatedResponse, EmployeeResponse, NewEmployee},
};
use crate::auth::Claims;
use crate::shared::{AppError, AppState, MessageResponse};

/// HTTP handler for listing all employees
///
/// GET /employees
#[instrument(name = "list_employees", skip(state, claims), fields(user_id = claims.user_id))]
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let service = EmployeeService::new(Arc::clone(&state.employee_repository));
    let employees = service.list_employees().await?;

    Ok(Json(employees))
}

/// GET /employees/:id
#[instrument(
    name = "get_employee",
    skip(state, claims, path),
    fields(user_id = claims.user_id)
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let Path(id) = path?;
    let service = EmployeeService::new(Arc::clone(&state.employee_repository));
    let employee = service.find_employee(id).await?;

    Ok(Json(employee.into()))
}

/// HTTP handler for creating an employee
///
/// POST /employees
/// Returns the new employee id
#[instrument(name = "create_employee", skip(state, claims, payload), fields(user_id = claims.user_id))]
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EmployeeCreatedResponse>, AppError> {
    let Json(payload) = payload?;
    let employee = NewEmployee::from_json(&payload)?;

    let service = EmployeeService::new(Arc::clone(&state.employee_repository));
    let created = service.create_employee(employee).await?;

    info!(employee_id = created.id, "Employee created via API");

    Ok(Json(EmployeeCreatedResponse {
        message: "Employee created".to_string(),
        id: created.id,
    }))
}

/// HTTP handler for partially updating an employee
///
/// PUT /employees/:id
/// A missing employee is reported before the body is looked at.
#[instrument(
    name = "update_employee",
    skip(state, claims, path, payload),
    fields(user_id = claims.user_id)
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    let service = EmployeeService::new(Arc::clone(&state.employee_repository));
    let existing = service.find_employee(id).await?;

    let Json(payload) = payload?;
    let changes = EmployeeChanges::from_json(&payload)?;
    service.update_employee(existing, changes).await?;

    Ok(Json(MessageResponse::new("Employee updated")))
}

/// DELETE /employees/:id
#[instrument(
    name = "delete_employee",
    skip(state, claims, path),
    fields(user_id = claims.user_id)
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = path?;
    let service = EmployeeService::new(Arc::clone(&state.employee_repository));
    service.delete_employee(id).await?;

    Ok(Json(MessageResponse::new("Employee deleted")))
}
