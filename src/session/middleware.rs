use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    token::{TokenError, TokenService},
    types::{VerifiedIdentity, TOKEN_COOKIE},
};
use crate::shared::{AppError, AppState};

/// Pulls the raw credential out of an incoming request
pub trait CredentialExtractor: Send + Sync {
    fn extract(&self, headers: &HeaderMap) -> Option<String>;
}

/// Turns a raw credential into a verified identity
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, credential: &str) -> Result<VerifiedIdentity, TokenError>;
}

/// Reads the credential from a named cookie
pub struct CookieCredentialExtractor {
    cookie_name: String,
}

impl CookieCredentialExtractor {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }
}

impl Default for CookieCredentialExtractor {
    fn default() -> Self {
        Self::new(TOKEN_COOKIE)
    }
}

impl CredentialExtractor for CookieCredentialExtractor {
    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        CookieJar::from_headers(headers)
            .get(&self.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

impl CredentialVerifier for TokenService {
    fn verify(&self, credential: &str) -> Result<VerifiedIdentity, TokenError> {
        TokenService::verify(self, credential).map(VerifiedIdentity::from)
    }
}

/// Gate in front of protected routes: absent credential is 401, invalid is 403
#[derive(Clone)]
pub struct SessionGate {
    extractor: Arc<dyn CredentialExtractor>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl SessionGate {
    pub fn new(
        extractor: Arc<dyn CredentialExtractor>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            extractor,
            verifier,
        }
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<VerifiedIdentity, AppError> {
        let credential = self.extractor.extract(headers).ok_or_else(|| {
            warn!("Missing session cookie in request");
            AppError::Unauthorized
        })?;

        self.verifier.verify(&credential).map_err(|e| {
            warn!(error = %e, "Session credential rejected");
            AppError::Forbidden
        })
    }
}

/// Session middleware - validates the `token` cookie and adds VerifiedIdentity to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::require_session))
/// Handlers can then extract Extension(identity): Extension<VerifiedIdentity>.
#[instrument(skip(state, req, next))]
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = state.session_gate.authenticate(req.headers())?;

    info!(email = %identity.email, uri = %req.uri(), "Session verified");

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
