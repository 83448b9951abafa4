use axum::http::StatusCode;
use serde_json::Value;

use super::actions::TestResponse;

// ============================================================================
// Assertion helpers
// ============================================================================

pub struct ResponseAssertion<'a> {
    response: &'a TestResponse,
}

impl<'a> ResponseAssertion<'a> {
    pub fn of(response: &'a TestResponse) -> Self {
        Self { response }
    }

    pub fn has_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.response.status,
            expected,
            "unexpected status, body: {}",
            self.response.text()
        );
        self
    }

    /// Error bodies carry `{error: true, code, message}`
    pub fn is_error_with_code(self, code: u16) -> Self {
        let body = self.response.json();
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], code);
        self
    }

    pub fn has_json(self, expected: Value) -> Self {
        assert_eq!(self.response.json(), expected);
        self
    }

    /// Asserts the body is an array and returns how many entries it holds
    pub fn array_len(self) -> usize {
        self.response
            .json()
            .as_array()
            .expect("response body should be a JSON array")
            .len()
    }
}
