use std::sync::Arc;
use tracing::instrument;

use super::models::ProductDocument;
use crate::shared::AppError;
use crate::store::{from_document, Document, DocumentStore};

pub const PRODUCTS_COLLECTION: &str = "products";

/// Read-only access to the products collection
pub struct ProductRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProductDocument>, AppError> {
        self.store
            .find(PRODUCTS_COLLECTION, &Document::new())
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }
}
