//! Common utilities for integration tests.
//!
//! This module provides shared test infrastructure for LocalStack-based
//! integration testing: client setup, bucket seeding and a collecting sink.

pub mod localstack;

pub use localstack::{CollectingSink, LocalStackTestContext, unique_bucket};
