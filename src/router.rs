use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::require_auth;
use crate::employee::{
    create_employee, delete_employee, get_employee, list_employees, update_employee,
};
use crate::password_reset::{request_password_reset, reset_password};
use crate::shared::AppState;
use crate::user::{login, logout, register};

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the full HTTP surface. Employee routes sit behind the bearer-token
/// gate; account routes and the health probe are public.
pub fn create_router(app_state: AppState) -> Router {
    let employee_routes = Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route_layer(middleware::from_fn_with_state(app_state.clone(), require_auth));

    let public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/password-reset-request", post(request_password_reset))
        .route("/password-reset", post(reset_password))
        .route("/health", get(health));

    Router::new()
        .merge(employee_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
