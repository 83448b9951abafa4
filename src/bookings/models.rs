use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::AppError;
use crate::store::{reject_reserved, Document, DocumentId, ID_FIELD};

/// Field that ties a booking to its owner; listing access is keyed on it
pub const EMAIL_FIELD: &str = "email";

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation(format!(
            "price must be a non-negative number, got {}",
            price
        )));
    }
    Ok(())
}

/// Request payload for booking a service
///
/// Fields beyond the known ones are stored alongside them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBooking {
    #[serde(
        rename = "customerName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub service: String,
    pub service_id: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Document,
}

impl NewBooking {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.email.contains('@') {
            return Err(AppError::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        if self.service.trim().is_empty() {
            return Err(AppError::Validation("service must not be empty".to_string()));
        }
        reject_reserved(&self.extra, &[ID_FIELD])?;
        validate_price(self.price)
    }
}

/// Booking as stored, including its identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingDocument {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub booking: NewBooking,
}

/// Partial update; only the fields present are written
///
/// Unknown fields are merged as given. The email and identifier cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingUpdate {
    #[serde(
        rename = "customerName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Document,
}

impl BookingUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        reject_reserved(&self.extra, &[EMAIL_FIELD, ID_FIELD])?;
        if let Some(service) = &self.service {
            if service.trim().is_empty() {
                return Err(AppError::Validation("service must not be empty".to_string()));
            }
        }
        self.price.map_or(Ok(()), validate_price)
    }
}

/// Query string accepted by `GET /bookings`
///
/// Every parameter becomes an equality condition on the stored field of the same name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub filters: BTreeMap<String, String>,
}

impl BookingQuery {
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            filters: BTreeMap::new(),
        }
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::to_document;
    use rstest::rstest;
    use serde_json::{json, Value};

    fn booking() -> NewBooking {
        NewBooking {
            customer_name: Some("Sam".to_string()),
            email: "sam@example.com".to_string(),
            date: Some("2024-05-01".to_string()),
            service: "Oil Change".to_string(),
            service_id: "01".to_string(),
            price: 49.99,
            img: None,
            status: None,
            extra: Document::new(),
        }
    }

    #[test]
    fn test_booking_uses_storefront_field_names() {
        let document = to_document(&booking()).unwrap();
        assert_eq!(
            Value::Object(document),
            json!({
                "customerName": "Sam",
                "email": "sam@example.com",
                "date": "2024-05-01",
                "service": "Oil Change",
                "service_id": "01",
                "price": 49.99
            })
        );
    }

    #[test]
    fn test_booking_keeps_additional_fields() {
        let booking: NewBooking = serde_json::from_value(json!({
            "email": "sam@example.com",
            "service": "Oil Change",
            "service_id": "01",
            "price": 49.99,
            "phone": "555-0100"
        }))
        .unwrap();

        assert_eq!(booking.extra.get("phone"), Some(&json!("555-0100")));
        assert_eq!(
            to_document(&booking).unwrap().get("phone"),
            Some(&json!("555-0100"))
        );
    }

    #[rstest]
    #[case("sam@example.com", "Oil Change", 10.0, true)]
    #[case("sam", "Oil Change", 10.0, false)]
    #[case("sam@example.com", " ", 10.0, false)]
    #[case("sam@example.com", "Oil Change", -0.5, false)]
    fn test_booking_validation(
        #[case] email: &str,
        #[case] service: &str,
        #[case] price: f64,
        #[case] valid: bool,
    ) {
        let booking = NewBooking {
            email: email.to_string(),
            service: service.to_string(),
            price,
            ..booking()
        };
        assert_eq!(booking.validate().is_ok(), valid);
    }

    #[test]
    fn test_booking_cannot_choose_its_identifier() {
        let mut booking = booking();
        booking.extra.insert(ID_FIELD.to_string(), json!("chosen"));
        assert!(matches!(booking.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_serializes_only_supplied_fields() {
        let update: BookingUpdate = serde_json::from_str(r#"{"status": "confirm"}"#).unwrap();
        assert_eq!(
            Value::Object(to_document(&update).unwrap()),
            json!({"status": "confirm"})
        );
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_carries_unknown_fields() {
        let update: BookingUpdate = serde_json::from_str(r#"{"notes": "call first"}"#).unwrap();
        assert!(update.validate().is_ok());
        assert_eq!(
            Value::Object(to_document(&update).unwrap()),
            json!({"notes": "call first"})
        );
    }

    #[rstest]
    #[case(r#"{"email": "other@example.com", "date": "2024-06-01"}"#)]
    #[case(r#"{"_id": "another", "status": "confirm"}"#)]
    fn test_update_rejects_reserved_fields(#[case] body: &str) {
        let update: BookingUpdate = serde_json::from_str(body).unwrap();
        assert!(matches!(update.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_update_rejects_negative_price() {
        let update = BookingUpdate {
            price: Some(-1.0),
            ..BookingUpdate::default()
        };
        assert!(matches!(update.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_query_becomes_equality_filter() {
        let query = BookingQuery::for_email("sam@example.com")
            .with_filter("service_id", "01")
            .with_filter("service", "Brakes");
        assert_eq!(
            Value::Object(to_document(&query).unwrap()),
            json!({"email": "sam@example.com", "service_id": "01", "service": "Brakes"})
        );
    }

    #[test]
    fn test_query_collects_any_parameter() {
        let query: BookingQuery = serde_json::from_value(json!({
            "email": "sam@example.com",
            "status": "confirm",
            "date": "2024-05-01"
        }))
        .unwrap();

        assert_eq!(query.email.as_deref(), Some("sam@example.com"));
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters.get("date").map(String::as_str), Some("2024-05-01"));
    }
}
