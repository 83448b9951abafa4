use serde::{Deserialize, Serialize};

use crate::store::{Document, DocumentId};

/// Storefront product as stored. Products are seeded outside this service, so
/// every attribute besides the identifier is passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub attributes: Document,
}
