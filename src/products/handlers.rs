use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{models::ProductDocument, repository::ProductRepository};
use crate::shared::{AppError, AppState};

/// HTTP handler for listing every product
///
/// GET /products
#[instrument(name = "list_products", skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductDocument>>, AppError> {
    let repository = ProductRepository::new(Arc::clone(&state.store));
    let products = repository.list().await?;

    info!(product_count = products.len(), "Products listed");
    Ok(Json(products))
}
