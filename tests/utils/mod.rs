pub mod actions;
pub mod assertions;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::TestResponse;
#[allow(unused_imports)]
pub use assertions::ResponseAssertion;
pub use setup::{TestSetup, TestSetupBuilder};
