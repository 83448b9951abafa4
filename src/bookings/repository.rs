use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::{BookingDocument, BookingQuery, BookingUpdate, NewBooking};
use crate::shared::AppError;
use crate::store::{
    from_document, to_document, DeleteResult, DocumentId, DocumentStore, InsertOneResult,
    UpdateResult,
};

pub const BOOKINGS_COLLECTION: &str = "bookings";

/// Typed access to the bookings collection
pub struct BookingRepository {
    store: Arc<dyn DocumentStore>,
}

impl BookingRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, booking))]
    pub async fn insert(&self, booking: &NewBooking) -> Result<InsertOneResult, AppError> {
        debug!(email = %booking.email, service_id = %booking.service_id, "Inserting booking");
        self.store
            .insert_one(BOOKINGS_COLLECTION, to_document(booking)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn find(&self, query: &BookingQuery) -> Result<Vec<BookingDocument>, AppError> {
        let filter = to_document(query)?;
        self.store
            .find(BOOKINGS_COLLECTION, &filter)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: DocumentId,
        update: &BookingUpdate,
    ) -> Result<UpdateResult, AppError> {
        self.store
            .update_one(BOOKINGS_COLLECTION, id, to_document(update)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: DocumentId) -> Result<DeleteResult, AppError> {
        self.store.delete_one(BOOKINGS_COLLECTION, id).await
    }
}
