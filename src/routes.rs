use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderValue, Method, Uri},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    bookings, products, services, session,
    shared::{AppError, AppState},
};

/// Cross-origin policy: only the configured storefront origins, with credentials
pub fn build_cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
}

async fn liveness(State(state): State<AppState>) -> String {
    format!("Server is running on port {}", state.port)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Wires every route; only `GET /bookings` sits behind the session gate
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let session_layer = middleware::from_fn_with_state(state.clone(), session::require_session);

    Router::new()
        .route("/", get(liveness))
        .route("/jwt", post(session::issue_token))
        .route("/logout", post(session::logout))
        .route(
            "/services",
            post(services::create_service).get(services::list_services),
        )
        .route("/services/:serviceId", get(services::get_service))
        .route("/products", get(products::list_products))
        .route("/bookings", post(bookings::create_booking))
        .route(
            "/bookings",
            get(bookings::list_bookings).route_layer(session_layer),
        )
        .route(
            "/bookings/:id",
            patch(bookings::update_booking).delete(bookings::delete_booking),
        )
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
