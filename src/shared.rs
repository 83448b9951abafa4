use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::session::{CookieCredentialExtractor, SessionGate, TokenService};
use crate::store::DocumentStore;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub token_service: Arc<TokenService>,
    pub session_gate: SessionGate,
    pub port: u16,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, token_service: Arc<TokenService>, port: u16) -> Self {
        let session_gate = SessionGate::new(
            Arc::new(CookieCredentialExtractor::default()),
            token_service.clone(),
        );

        Self {
            store,
            token_service,
            session_gate,
            port,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized access!")]
    Unauthorized,

    #[error("Access Forbidden!")]
    Forbidden,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Token error: {0}")]
    TokenIssue(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) | AppError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::TokenIssue(_) | AppError::DatabaseError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::TokenIssue(_) => "There was internal server error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": true,
            "code": status.as_u16(),
            "message": message
        }));

        (status, body).into_response()
    }
}
