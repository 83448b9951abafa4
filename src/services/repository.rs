use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::{NewService, ServiceDocument, ServiceSummary};
use crate::shared::AppError;
use crate::store::{from_document, to_document, Document, DocumentId, DocumentStore, InsertOneResult};

pub const SERVICES_COLLECTION: &str = "services";

/// Typed access to the services collection
pub struct ServiceRepository {
    store: Arc<dyn DocumentStore>,
}

impl ServiceRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, service))]
    pub async fn insert(&self, service: &NewService) -> Result<InsertOneResult, AppError> {
        debug!(title = %service.title, "Inserting service");
        self.store
            .insert_one(SERVICES_COLLECTION, to_document(service)?)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ServiceDocument>, AppError> {
        self.store
            .find(SERVICES_COLLECTION, &Document::new())
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn find_summary(&self, id: DocumentId) -> Result<Option<ServiceSummary>, AppError> {
        self.store
            .find_one(SERVICES_COLLECTION, id, Some(&ServiceSummary::FIELDS[..]))
            .await?
            .map(from_document)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryDocumentStore, ID_FIELD};

    fn oil_change() -> NewService {
        NewService {
            title: "Oil Change".to_string(),
            img: "x.png".to_string(),
            price: 49.99,
            description: Some("Synthetic blend".to_string()),
            service_id: Some("01".to_string()),
            facility: vec![],
            extra: Document::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_list() {
        let repository = ServiceRepository::new(Arc::new(InMemoryDocumentStore::new()));

        let result = repository.insert(&oil_change()).await.unwrap();
        let services = repository.list().await.unwrap();

        assert_eq!(services.len(), 1);
        assert_eq!(services[0].id, result.inserted_id);
        assert_eq!(services[0].service, oil_change());
    }

    #[tokio::test]
    async fn test_find_summary_is_projected() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let repository = ServiceRepository::new(store.clone());
        let id = repository.insert(&oil_change()).await.unwrap().inserted_id;

        let summary = repository.find_summary(id).await.unwrap().unwrap();
        assert_eq!(
            summary,
            ServiceSummary {
                title: "Oil Change".to_string(),
                img: "x.png".to_string(),
                price: 49.99,
            }
        );

        let raw = store
            .find_one(SERVICES_COLLECTION, id, Some(&ServiceSummary::FIELDS[..]))
            .await
            .unwrap()
            .unwrap();
        assert!(raw.get(ID_FIELD).is_none());
        assert!(raw.get("description").is_none());
    }

    #[tokio::test]
    async fn test_find_summary_missing() {
        let repository = ServiceRepository::new(Arc::new(InMemoryDocumentStore::new()));
        let summary = repository
            .find_summary(DocumentId::generate())
            .await
            .unwrap();
        assert!(summary.is_none());
    }
}
