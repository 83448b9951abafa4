use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{BookingDocument, BookingQuery, BookingUpdate, NewBooking},
    repository::BookingRepository,
};
use crate::session::VerifiedIdentity;
use crate::shared::{AppError, AppState};
use crate::store::{DeleteResult, DocumentId, InsertOneResult, UpdateResult};

/// HTTP handler for booking a service
///
/// POST /bookings
#[instrument(name = "create_booking", skip(state, booking))]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<NewBooking>,
) -> Result<Json<InsertOneResult>, AppError> {
    booking.validate()?;

    let repository = BookingRepository::new(Arc::clone(&state.store));
    let result = repository.insert(&booking).await?;

    info!(id = %result.inserted_id, email = %booking.email, "Booking created");
    Ok(Json(result))
}

/// HTTP handler for listing the caller's bookings
///
/// GET /bookings?email=...
/// Requires a verified session. A query email that differs from the session's
/// yields an empty list rather than an error.
#[instrument(name = "list_bookings", skip(state, identity))]
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<Vec<BookingDocument>>, AppError> {
    if query.email.as_deref() != Some(identity.email.as_str()) {
        warn!(
            session_email = %identity.email,
            query_email = ?query.email,
            "Booking query email does not match session, returning nothing"
        );
        return Ok(Json(Vec::new()));
    }

    let repository = BookingRepository::new(Arc::clone(&state.store));
    let bookings = repository.find(&query).await?;

    info!(email = %identity.email, booking_count = bookings.len(), "Bookings listed");
    Ok(Json(bookings))
}

/// HTTP handler for cancelling a booking
///
/// DELETE /bookings/:id
#[instrument(name = "delete_booking", skip(state))]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let id: DocumentId = id.parse()?;

    let repository = BookingRepository::new(Arc::clone(&state.store));
    let result = repository.delete(id).await?;

    info!(id = %id, deleted_count = result.deleted_count, "Booking delete handled");
    Ok(Json(result))
}

/// HTTP handler for changing some fields of a booking
///
/// PATCH /bookings/:id
#[instrument(name = "update_booking", skip(state, update))]
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<BookingUpdate>,
) -> Result<Json<UpdateResult>, AppError> {
    let id: DocumentId = id.parse()?;
    update.validate()?;

    let repository = BookingRepository::new(Arc::clone(&state.store));
    let result = repository.update(id, &update).await?;

    info!(
        id = %id,
        matched_count = result.matched_count,
        modified_count = result.modified_count,
        "Booking update handled"
    );
    Ok(Json(result))
}
