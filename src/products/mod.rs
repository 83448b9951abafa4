// Public API - what other modules can use
pub use handlers::list_products;
pub use models::ProductDocument;
pub use repository::{ProductRepository, PRODUCTS_COLLECTION};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
