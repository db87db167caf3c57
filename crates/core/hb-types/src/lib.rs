//! Core types for harbor.
//!
//! This crate provides the foundational types used throughout the connector:
//! - [`SyncConfiguration`] - Parsed inbound sync request
//! - [`RawObject`] / [`ObjectPage`] - Provider listing records and pages
//! - [`ObjectDescriptor`] - Normalized record delivered to the host

pub mod config;
pub mod descriptor;
pub mod object;

pub use config::*;
pub use descriptor::*;
pub use object::*;
