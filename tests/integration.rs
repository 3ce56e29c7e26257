//! End-to-end tests against a mock Xata server.
//!
//! Run with:
//!   cargo test --test integration

#[path = "integration/common.rs"]
mod common;
#[path = "integration/errors.rs"]
mod errors;
#[path = "integration/records.rs"]
mod records;
#[path = "integration/schema.rs"]
mod schema;
