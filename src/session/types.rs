use serde::{Deserialize, Serialize};

use crate::shared::AppError;
use crate::store::{reject_reserved, Document};

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// Claim names set by the token service itself
pub const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// JWT claims structure carrying the signed-in user's identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub email: String,
    pub iat: i64, // Issued at timestamp (standard JWT claim)
    pub exp: i64, // Expiration timestamp (standard JWT claim)
    /// Remaining identity fields, signed as sent at login
    #[serde(flatten)]
    pub extra: Document,
}

/// Request payload for `POST /jwt`
///
/// Every field is signed into the token; the email is required.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SessionIdentity {
    pub email: String,
    #[serde(flatten)]
    pub extra: Document,
}

impl SessionIdentity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: Document::new(),
        }
    }

    /// Validates the identity and trims the email so later lookups match exactly
    pub fn normalized(mut self) -> Result<Self, AppError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("email must not be empty".to_string()));
        }
        if !email.contains('@') {
            return Err(AppError::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        reject_reserved(&self.extra, &RESERVED_CLAIMS)?;

        self.email = email.to_string();
        Ok(self)
    }
}

/// Identity attached to a request once its session cookie has been verified
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub email: String,
    pub extra: Document,
}

impl From<SessionClaims> for VerifiedIdentity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            email: claims.email,
            extra: claims.extra,
        }
    }
}

/// Response for `POST /jwt`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub token: String,
}

/// Response for `POST /logout`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LogoutResponse {
    pub success: bool,
}
