#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{header, Request},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::{assertions::TestResponse, setup::TestSetup};

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a request through a fresh clone of the router and buffer the response
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn register(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/register",
            None,
            Some(json!({"name": name, "email": email, "password": password})),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/login",
            None,
            Some(json!({"email": email, "password": password})),
        )
        .await
    }

    /// Register the default user and return a bearer token for it
    pub async fn authenticated_token(&self) -> String {
        self.register("A", "a@x.com", "secret1").await.assert_ok();
        self.login("a@x.com", "secret1")
            .await
            .assert_ok()
            .string_field("token")
    }

    pub async fn create_employee(&self, token: &str, name: &str, email: &str) -> TestResponse {
        self.request(
            "POST",
            "/employees",
            Some(token),
            Some(json!({
                "name": name,
                "email": email,
                "department": "QA",
                "phone": "1234567890"
            })),
        )
        .await
    }

    pub async fn get_employee(&self, token: &str, id: i64) -> TestResponse {
        self.request("GET", &format!("/employees/{id}"), Some(token), None)
            .await
    }
}
