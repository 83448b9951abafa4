use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{NewService, ServiceDocument, ServiceSummary},
    repository::ServiceRepository,
};
use crate::shared::{AppError, AppState};
use crate::store::{DocumentId, InsertOneResult};

/// HTTP handler for creating a service
///
/// POST /services
#[instrument(name = "create_service", skip(state, service))]
pub async fn create_service(
    State(state): State<AppState>,
    Json(service): Json<NewService>,
) -> Result<Json<InsertOneResult>, AppError> {
    service.validate()?;

    let repository = ServiceRepository::new(Arc::clone(&state.store));
    let result = repository.insert(&service).await?;

    info!(id = %result.inserted_id, title = %service.title, "Service created");
    Ok(Json(result))
}

/// HTTP handler for listing every service
///
/// GET /services
#[instrument(name = "list_services", skip(state))]
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceDocument>>, AppError> {
    let repository = ServiceRepository::new(Arc::clone(&state.store));
    let services = repository.list().await?;

    info!(service_count = services.len(), "Services listed");
    Ok(Json(services))
}

/// HTTP handler for fetching one service's title, image and price
///
/// GET /services/:serviceId
/// Responds with `null` when no service has that identifier
#[instrument(name = "get_service", skip(state))]
pub async fn get_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<Json<Option<ServiceSummary>>, AppError> {
    let id: DocumentId = service_id.parse()?;

    let repository = ServiceRepository::new(Arc::clone(&state.store));
    let summary = repository.find_summary(id).await?;

    info!(id = %id, found = summary.is_some(), "Service fetched");
    Ok(Json(summary))
}
