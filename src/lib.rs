// Library crate for the Car Doctor storefront backend
// This file exposes the public API for integration tests

pub mod bookings;
pub mod config;
pub mod products;
pub mod routes;
pub mod services;
pub mod session;
pub mod shared;
pub mod store;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use routes::{build_cors, build_router};
pub use session::{TokenService, VerifiedIdentity};
pub use shared::{AppError, AppState};
pub use store::{DocumentId, DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};
