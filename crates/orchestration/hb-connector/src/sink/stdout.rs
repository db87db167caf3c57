//! Stdout sink.

use async_trait::async_trait;
use hb_error::{DeliveryError, Result};
use hb_traits::Sink;
use hb_types::{ObjectDescriptor, Page};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Output format for stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON Lines format - one page per line (default)
    #[default]
    Jsonl,

    /// Pretty-printed JSON
    Json,
}

/// One delivered page as written to stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Container the page belongs to
    pub container: String,

    /// Sequence number of the page within this sink
    pub page: usize,

    /// Descriptors in provider order
    pub resources: Vec<ObjectDescriptor>,
}

/// Stdout sink implementation.
///
/// Writes one record per page. With JSONL each page is a single line,
/// suitable for piping to `jq`.
pub struct StdoutSink {
    format: OutputFormat,
    sequence: AtomicUsize,
}

impl StdoutSink {
    /// Create a new StdoutSink with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            sequence: AtomicUsize::new(0),
        }
    }

    /// Create a new StdoutSink with JSONL format (default).
    pub fn jsonl() -> Self {
        Self::new(OutputFormat::Jsonl)
    }

    /// Create a new StdoutSink with pretty-printed JSON format.
    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }

    /// Render a page as it would be written.
    pub fn render(&self, record: &PageRecord) -> Result<String> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(record),
            OutputFormat::Jsonl => serde_json::to_string(record),
        };
        rendered.map_err(|e| DeliveryError::Serialize(e.to_string()).into())
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::jsonl()
    }
}

#[async_trait]
impl Sink for StdoutSink {
    async fn deliver(&self, container: &str, page: Page) -> Result<()> {
        let record = PageRecord {
            container: container.to_string(),
            page: self.sequence.fetch_add(1, Ordering::Relaxed),
            resources: page,
        };
        let output = self.render(&record)?;

        write_line(&output)
            .map_err(|e| DeliveryError::Transport(format!("Failed to write stdout: {e}")))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

fn write_line(line: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()
}
