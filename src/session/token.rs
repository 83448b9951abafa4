use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, instrument};

use super::types::{SessionClaims, SessionIdentity};

/// Lifetime of an issued session token, in seconds
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Source of the current time, injectable so expiry can be tested
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(String),

    /// Bad signature, malformed token or expiry all collapse into this
    #[error("Invalid or expired token")]
    Invalid,
}

/// Issues and verifies signed session tokens
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::seconds(TOKEN_TTL_SECONDS),
            clock,
        }
    }

    /// Signs a token for the identity, valid for one hour from now
    #[instrument(skip(self, identity))]
    pub fn issue(&self, identity: &SessionIdentity) -> Result<String, TokenError> {
        let now = self.clock.now();
        let claims = SessionClaims {
            email: identity.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            extra: identity.extra.clone(),
        };

        debug!(exp_timestamp = claims.exp, "Signing session token");

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode session token");
            TokenError::Signing(e.to_string())
        })
    }

    /// Checks signature and expiry against the injected clock
    #[instrument(skip(self, token))]
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        // Expiry is checked below against our own clock rather than the library's
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "Failed to decode session token");
            TokenError::Invalid
        })?;

        if claims.exp <= self.clock.now().timestamp() {
            debug!(exp = claims.exp, "Session token has expired");
            return Err(TokenError::Invalid);
        }

        debug!(email = %claims.email, "Session token verified");
        Ok(claims)
    }
}
