//! Common test infrastructure
//!
//! Fixture collections and inventories shared by the end-to-end tests,
//! plus helpers to put them on disk or behind an in-process app.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{beatles_collection, test_app};
//!
//! #[tokio::test]
//! async fn test_match() {
//!     let app = test_app();
//!     // app.oneshot(request).await
//! }
//! ```

mod fixtures;

#[allow(unused_imports)]
pub use fixtures::*;
