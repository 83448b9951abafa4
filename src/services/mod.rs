// Public API - what other modules can use
pub use handlers::{create_service, get_service, list_services};
pub use models::{Facility, NewService, ServiceDocument, ServiceSummary};
pub use repository::{ServiceRepository, SERVICES_COLLECTION};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
