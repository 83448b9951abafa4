// Public API - what other modules can use
pub use handlers::{issue_token, logout};
pub use middleware::{
    require_session, CookieCredentialExtractor, CredentialExtractor, CredentialVerifier,
    SessionGate,
};
pub use token::{Clock, ManualClock, SystemClock, TokenError, TokenService, TOKEN_TTL_SECONDS};
pub use types::{
    LogoutResponse, SessionClaims, SessionIdentity, TokenResponse, VerifiedIdentity,
    RESERVED_CLAIMS, TOKEN_COOKIE,
};

// Internal modules
mod handlers;
mod middleware;
mod token;
mod types;
