use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use super::setup::TestSetup;

/// Response captured from the router with its body already read
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The `name=value` part of the first Set-Cookie header
    pub fn cookie_pair(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|pair| pair.trim().to_string())
    }
}

// ============================================================================
// Request helpers
// ============================================================================

impl TestSetup {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Signs in and returns the cookie to send on later requests
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/jwt",
                None,
                Some(serde_json::json!({ "email": email })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.cookie_pair().expect("login should set a cookie")
    }

    pub async fn create_service(&self, service: Value) -> String {
        let response = self.send(Method::POST, "/services", None, Some(service)).await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()["insertedId"].as_str().unwrap().to_string()
    }

    pub async fn create_booking(&self, booking: Value) -> String {
        let response = self.send(Method::POST, "/bookings", None, Some(booking)).await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()["insertedId"].as_str().unwrap().to_string()
    }

    pub async fn list_bookings(&self, cookie: Option<&str>, query: &str) -> TestResponse {
        self.send(Method::GET, &format!("/bookings{}", query), cookie, None)
            .await
    }
}
