use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::AppError;

/// Schema-less record as persisted in a collection
pub type Document = serde_json::Map<String, Value>;

/// Field under which every stored document carries its identifier
pub const ID_FIELD: &str = "_id";

/// Store-assigned unique identifier of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generates a fresh identifier for a document about to be inserted
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for DocumentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for DocumentId {
    type Err = AppError;

    /// Malformed identifiers are rejected up front instead of silently matching nothing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| AppError::InvalidIdentifier(s.to_string()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outcome of inserting a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

/// Outcome of a merge-update addressed by identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<DocumentId>,
}

/// Outcome of a delete addressed by identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Converts a typed record into a document. Records must serialize to a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, AppError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(AppError::Internal(format!(
            "expected a JSON object, got {}",
            other
        ))),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Reads a typed record back out of a stored document
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(document)).map_err(|e| AppError::Internal(e.to_string()))
}

/// Keeps only the named fields. The identifier is dropped unless explicitly requested.
pub fn project(document: &Document, fields: &[&str]) -> Document {
    fields
        .iter()
        .filter_map(|field| {
            document
                .get(*field)
                .map(|value| (field.to_string(), value.clone()))
        })
        .collect()
}

/// Rejects a payload that tries to set any of the reserved fields
pub fn reject_reserved(fields: &Document, reserved: &[&str]) -> Result<(), AppError> {
    match reserved.iter().find(|field| fields.contains_key(**field)) {
        Some(field) => Err(AppError::Validation(format!(
            "field '{}' cannot be set here",
            field
        ))),
        None => Ok(()),
    }
}

/// Top-level equality match; an empty filter matches everything
pub fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

/// Shallow `$set`-style merge. Returns whether any field actually changed.
pub fn merge_fields(document: &mut Document, fields: &Document) -> bool {
    let mut modified = false;
    for (key, value) in fields {
        if key == ID_FIELD {
            continue;
        }
        if document.get(key) != Some(value) {
            document.insert(key.clone(), value.clone());
            modified = true;
        }
    }
    modified
}
