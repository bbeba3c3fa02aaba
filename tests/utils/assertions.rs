//! Test assertion helpers - fluent API for verifying HTTP responses
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::http::StatusCode;
use serde_json::Value;

// ============================================================================
// Assertion Helpers
// ============================================================================

/// A fully buffered response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status, expected,
            "unexpected status, body was {}",
            self.body
        );
        self
    }

    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    /// Asserts the `message` field of a success body
    pub fn assert_message(self, expected: &str) -> Self {
        assert_eq!(self.body["message"], expected, "body was {}", self.body);
        self
    }

    /// Asserts the `error` field of a failure body
    pub fn assert_error(self, expected: &str) -> Self {
        assert_eq!(self.body["error"], expected, "body was {}", self.body);
        self
    }

    pub fn string_field(&self, field: &str) -> String {
        self.body[field]
            .as_str()
            .unwrap_or_else(|| panic!("{field} missing from {}", self.body))
            .to_string()
    }

    pub fn id(&self) -> i64 {
        self.body["id"]
            .as_i64()
            .unwrap_or_else(|| panic!("id missing from {}", self.body))
    }
}
