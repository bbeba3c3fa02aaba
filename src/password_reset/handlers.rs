use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::{
    service::PasswordResetService,
    types::{ResetPassword, ResetRequest, ResetRequestResponse},
};
use crate::shared::{AppError, AppState, MessageResponse};

fn reset_service(state: &AppState) -> PasswordResetService {
    PasswordResetService::new(
        Arc::clone(&state.reset_repository),
        Arc::clone(&state.user_repository),
        state.password_hasher.clone(),
        state.reset_config,
    )
}

/// HTTP handler for requesting a password reset
///
/// POST /password-reset-request
#[instrument(name = "request_password_reset", skip(state, payload))]
pub async fn request_password_reset(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ResetRequestResponse>, AppError> {
    let Json(payload) = payload?;
    let request = ResetRequest::from_json(&payload)?;

    let response = reset_service(&state).request_reset(request).await?;

    Ok(Json(response))
}

/// HTTP handler for redeeming a reset token
///
/// POST /password-reset
#[instrument(name = "reset_password", skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;
    let reset = ResetPassword::from_json(&payload)?;

    reset_service(&state).reset_password(reset).await?;

    Ok(Json(MessageResponse::new("Password reset successful!")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password_reset::PasswordResetConfig;
    use crate::shared::test_utils::AppStateBuilder;
    use crate::user::{
        models::NewUser,
        repository::{InMemoryUserRepository, UserRepository},
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
        routing::post,
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt; // for `oneshot`

    async fn app(config: PasswordResetConfig) -> Router {
        let users = Arc::new(InMemoryUserRepository::new());
        users
            .create_user(&NewUser {
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                password_hash: "unused".to_string(),
            })
            .await
            .unwrap();

        let app_state = AppStateBuilder::new()
            .with_user_repository(users)
            .with_reset_config(config)
            .build();

        Router::new()
            .route("/password-reset-request", post(request_password_reset))
            .route("/password-reset", post(reset_password))
            .with_state(app_state)
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_request_then_reset() {
        let app = app(PasswordResetConfig::default()).await;

        let response = app
            .clone()
            .oneshot(json_request("/password-reset-request", json!({"email": "a@x.com"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Password reset email sent");
        let token = body["token"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "/password-reset",
                json!({"token": token, "password": "newpass1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Password reset successful!");

        let response = app
            .oneshot(json_request(
                "/password-reset",
                json!({"token": token, "password": "newpass2"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_request_hides_token_in_production_mode() {
        let app = app(PasswordResetConfig {
            token_ttl_minutes: 60,
            expose_token: false,
        })
        .await;

        let response = app
            .oneshot(json_request("/password-reset-request", json!({"email": "a@x.com"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await.get("token").is_none());
    }

    #[tokio::test]
    async fn test_request_errors() {
        let app = app(PasswordResetConfig::default()).await;

        let response = app
            .clone()
            .oneshot(json_request("/password-reset-request", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Email is required");

        let response = app
            .oneshot(json_request(
                "/password-reset-request",
                json!({"email": "nobody@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "User not found");
    }

    #[tokio::test]
    async fn test_reset_requires_token_and_password() {
        let response = app(PasswordResetConfig::default())
            .await
            .oneshot(json_request("/password-reset", json!({"password": "newpass1"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Token and password are required"
        );
    }
}
