// Public API - what other modules can use
pub use document::{
    from_document, reject_reserved, to_document, DeleteResult, Document, DocumentId,
    InsertOneResult, UpdateResult, ID_FIELD,
};
pub use repository::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};

// Internal modules
mod document;
pub mod repository;
