//! Logging initialization utilities.

use anyhow::{Result, anyhow};
use tracing::Level;
use tracing_subscriber::fmt;

use crate::{LogFormat, LogLevel};

/// Initialize logging with the specified level and format.
///
/// Logs are written to stderr so stdout remains clean for delivered pages.
pub fn init_logging(level: LogLevel, format: LogFormat) -> Result<()> {
    let level: Level = level.into();

    let builder = fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    installed.map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}
