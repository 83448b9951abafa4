use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Row};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::document::{
    matches_filter, merge_fields, project, DeleteResult, Document, DocumentId, InsertOneResult,
    UpdateResult, ID_FIELD,
};
use crate::shared::AppError;

/// Operations the service needs from the external document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document, assigning it a fresh identifier
    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<InsertOneResult, AppError>;

    /// Returns every document whose top-level fields equal the filter's
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, AppError>;

    /// Fetches a single document, optionally restricted to the projected fields
    async fn find_one(
        &self,
        collection: &str,
        id: DocumentId,
        projection: Option<&[&str]>,
    ) -> Result<Option<Document>, AppError>;

    /// Merges the supplied fields into the document; unspecified fields keep their values
    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> Result<UpdateResult, AppError>;

    async fn delete_one(&self, collection: &str, id: DocumentId) -> Result<DeleteResult, AppError>;

    async fn ping(&self) -> Result<(), AppError>;

    /// Releases the underlying connection; called once at shutdown
    async fn close(&self);
}

fn has_id(document: &Document, id: DocumentId) -> bool {
    document.get(ID_FIELD) == Some(&Value::String(id.to_string()))
}

fn apply_projection(document: Document, projection: Option<&[&str]>) -> Document {
    match projection {
        Some(fields) => project(&document, fields),
        None => document,
    }
}

/// In-memory implementation of DocumentStore for development and testing
///
/// Collections keep insertion order so listings are stable. Data is lost when
/// the process exits.
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the number of documents currently held in a collection
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    #[instrument(skip(self, document))]
    async fn insert_one(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<InsertOneResult, AppError> {
        let id = DocumentId::generate();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

        debug!(collection, id = %id, "Document inserted in memory");
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    #[instrument(skip(self, filter))]
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, AppError> {
        let collections = self.collections.read().await;
        let documents: Vec<Document> = collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches_filter(document, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        debug!(collection, count = documents.len(), "Documents found in memory");
        Ok(documents)
    }

    #[instrument(skip(self, projection))]
    async fn find_one(
        &self,
        collection: &str,
        id: DocumentId,
        projection: Option<&[&str]>,
    ) -> Result<Option<Document>, AppError> {
        let collections = self.collections.read().await;
        let document = collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|document| has_id(document, id)))
            .cloned()
            .map(|document| apply_projection(document, projection));

        debug!(collection, id = %id, found = document.is_some(), "Document lookup in memory");
        Ok(document)
    }

    #[instrument(skip(self, fields))]
    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Document,
    ) -> Result<UpdateResult, AppError> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| has_id(document, id)));

        let (matched_count, modified_count) = match target {
            Some(document) => (1, u64::from(merge_fields(document, &fields))),
            None => {
                debug!(collection, id = %id, "No document matched update in memory");
                (0, 0)
            }
        };

        Ok(UpdateResult {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: None,
        })
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, collection: &str, id: DocumentId) -> Result<DeleteResult, AppError> {
        let mut collections = self.collections.write().await;
        let deleted_count: u64 = match collections.get_mut(collection) {
            Some(documents) => match documents.iter().position(|document| has_id(document, id)) {
                Some(index) => {
                    documents.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        debug!(collection, id = %id, deleted_count, "Delete applied in memory");
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn close(&self) {
        debug!("In-memory document store closed");
    }
}

/// PostgreSQL implementation of DocumentStore
///
/// All collections share one `documents` table; each row holds the document
/// body as JSONB alongside its collection name.
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and makes sure the backing table exists
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to connect to document database");
                AppError::DatabaseError(e.to_string())
            })?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        info!("Connected to document database");
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                id UUID PRIMARY KEY,
                collection TEXT NOT NULL,
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS documents_collection_idx ON documents (collection, created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    fn body_from_row(row: &sqlx::postgres::PgRow) -> Result<Document, AppError> {
        row.try_get::<Json<Document>, _>("body")
            .map(|Json(document)| document)
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, document))]
    async fn insert_one(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<InsertOneResult, AppError> {
        let id = DocumentId::generate();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id.as_uuid())
            .bind(collection)
            .bind(Json(Value::Object(document)))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, collection, "Failed to insert document");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(collection, id = %id, "Document inserted in database");
        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    #[instrument(skip(self, filter))]
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 AND body @> $2 ORDER BY created_at",
        )
        .bind(collection)
        .bind(Json(Value::Object(filter.clone())))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, collection, "Failed to query documents");
            AppError::DatabaseError(e.to_string())
        })?;

        let documents = rows
            .iter()
            .map(Self::body_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        // Containment also matches array supersets; narrow to exact equality
        let documents: Vec<Document> = documents
            .into_iter()
            .filter(|document| matches_filter(document, filter))
            .collect();

        debug!(collection, count = documents.len(), "Documents found in database");
        Ok(documents)
    }

    #[instrument(skip(self, projection))]
    async fn find_one(
        &self,
        collection: &str,
        id: DocumentId,
        projection: Option<&[&str]>,
    ) -> Result<Option<Document>, AppError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, collection, id = %id, "Failed to fetch document");
                AppError::DatabaseError(e.to_string())
            })?;

        let document = row
            .as_ref()
            .map(Self::body_from_row)
            .transpose()?
            .map(|document| apply_projection(document, projection));

        debug!(collection, id = %id, found = document.is_some(), "Document lookup in database");
        Ok(document)
    }

    #[instrument(skip(self, fields))]
    async fn update_one(
        &self,
        collection: &str,
        id: DocumentId,
        mut fields: Document,
    ) -> Result<UpdateResult, AppError> {
        fields.remove(ID_FIELD);
        let fields = Json(Value::Object(fields));

        let modified = sqlx::query(
            "UPDATE documents SET body = body || $3
             WHERE collection = $1 AND id = $2 AND body IS DISTINCT FROM body || $3",
        )
        .bind(collection)
        .bind(id.as_uuid())
        .bind(&fields)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, collection, id = %id, "Failed to update document");
            AppError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        let matched = if modified > 0 {
            modified
        } else {
            sqlx::query("SELECT 1 FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?
                .map_or(0, |_| 1)
        };

        debug!(collection, id = %id, matched, modified, "Update applied in database");
        Ok(UpdateResult {
            acknowledged: true,
            matched_count: matched,
            modified_count: modified,
            upserted_id: None,
        })
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, collection: &str, id: DocumentId) -> Result<DeleteResult, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, collection, id = %id, "Failed to delete document");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(collection, id = %id, deleted = result.rows_affected(), "Delete applied in database");
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Document database connection closed");
    }
}
