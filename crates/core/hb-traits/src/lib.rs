//! Core traits for harbor.
//!
//! This crate defines the two seams around the enumeration engine:
//! - [`StorageClient`] - Container discovery and paginated object listing
//! - [`Sink`] - Consumer-side receiver of descriptor pages

pub mod sink;
pub mod storage;

pub use sink::*;
pub use storage::*;
