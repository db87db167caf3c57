//! Sink implementations for delivered pages.
//!
//! This module provides [`Sink`](hb_traits::Sink) implementations:
//! - [`StdoutSink`] - Writes each page to stdout as JSON or JSONL
//! - [`HttpSink`] - POSTs each page to a host callback endpoint

mod http;
mod stdout;

pub use http::{DEFAULT_CALLBACK_TIMEOUT_SECS, HttpSink, HttpSinkConfig};
pub use stdout::{OutputFormat, PageRecord, StdoutSink};
