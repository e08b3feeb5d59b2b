//! Integration test crate for the Atelier marketplace.
//!
//! This crate has no library code — it only contains integration tests
//! that exercise end-to-end marketplace flows across multiple workspace
//! crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p atelier-integration-tests
//! ```
