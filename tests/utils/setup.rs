use axum::Router;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use car_doctor::{
    build_cors, build_router,
    products::PRODUCTS_COLLECTION,
    session::ManualClock,
    AppState, DocumentStore, InMemoryDocumentStore, TokenService,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PORT: u16 = 9000;
pub const STOREFRONT_ORIGIN: &str = "https://car-doctor-244f4.web.app";

pub struct TestSetup {
    pub app: Router,
    pub store: Arc<InMemoryDocumentStore>,
    pub clock: Arc<ManualClock>,
}

pub struct TestSetupBuilder {
    products: Vec<Value>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { products: vec![] }
    }

    /// Seeds the products collection, which the API itself never writes
    pub fn with_products(mut self, products: Vec<Value>) -> Self {
        self.products = products;
        self
    }

    pub async fn build(self) -> TestSetup {
        let store = Arc::new(InMemoryDocumentStore::new());
        for product in self.products {
            let document = product
                .as_object()
                .cloned()
                .expect("seed products must be JSON objects");
            store
                .insert_one(PRODUCTS_COLLECTION, document)
                .await
                .unwrap();
        }

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let token_service = Arc::new(TokenService::with_clock(TEST_SECRET, clock.clone()));
        let state = AppState::new(store.clone(), token_service, TEST_PORT);
        let app = build_router(state, build_cors(&[STOREFRONT_ORIGIN.to_string()]));

        TestSetup { app, store, clock }
    }
}
