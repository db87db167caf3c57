//! Shared utilities for harbor CLI binaries.

pub mod args;
pub mod format;
pub mod logging;

pub use args::{LogFormat, LogLevel};
pub use format::format_count;
pub use logging::init_logging;
