use axum::{body::Bytes, extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::types::{LogoutResponse, SessionIdentity, TokenResponse, TOKEN_COOKIE};
use crate::shared::{AppError, AppState};

/// Cookie holding the session token; cross-site capable so the storefront can send it
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build()
}

/// HTTP handler for issuing a session token
///
/// POST /jwt
/// Sets the `token` cookie and returns the token in the body
#[instrument(name = "issue_token", skip(state, jar, identity))]
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(identity): Json<SessionIdentity>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let identity = identity.normalized()?;

    let token = state.token_service.issue(&identity).map_err(|e| {
        warn!(error = %e, "Session token issuance failed");
        AppError::TokenIssue(e.to_string())
    })?;

    info!(email = %identity.email, "Session token issued");

    Ok((
        jar.add(session_cookie(token.clone())),
        Json(TokenResponse { token }),
    ))
}

/// HTTP handler for signing out
///
/// POST /logout
/// Always succeeds; the cookie is cleared whether or not one was sent
#[instrument(name = "logout", skip(jar, body))]
pub async fn logout(jar: CookieJar, body: Bytes) -> (CookieJar, Json<LogoutResponse>) {
    let user: Option<Value> = serde_json::from_slice(&body).ok();
    info!(user = ?user, "Logging out user");

    let mut cookie = session_cookie(String::new());
    cookie.make_removal();

    (jar.add(cookie), Json(LogoutResponse { success: true }))
}
