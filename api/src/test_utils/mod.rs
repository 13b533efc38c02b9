//! Test utilities
//!
//! An in-memory store implementing every repository port, plus fixtures.
//!
//! The store enforces the schema's unique, foreign-key and cascade rules, so
//! service tests and the HTTP tests in `integration_tests` exercise the same
//! error paths as PostgreSQL without a database. It is also exported behind
//! the `test-utils` feature for the importer's tests.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
