use serde::{Deserialize, Serialize};

use crate::shared::AppError;
use crate::store::{reject_reserved, Document, DocumentId, ID_FIELD};

/// One line item of what a repair service includes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facility {
    pub name: String,
    #[serde(default)]
    pub details: String,
}

/// Request payload for creating a service
///
/// Fields beyond the known ones are stored alongside them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewService {
    pub title: String,
    pub img: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default)]
    pub facility: Vec<Facility>,
    #[serde(flatten)]
    pub extra: Document,
}

impl NewService {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation(format!(
                "price must be a non-negative number, got {}",
                self.price
            )));
        }
        reject_reserved(&self.extra, &[ID_FIELD])
    }
}

/// Service as stored, including its identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceDocument {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub service: NewService,
}

/// Restricted view returned when fetching a single service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSummary {
    pub title: String,
    pub img: String,
    pub price: f64,
}

impl ServiceSummary {
    /// Fields kept by the store projection
    pub const FIELDS: [&'static str; 3] = ["title", "img", "price"];
}
