//! CLI argument definitions for hb-connector.

use clap::{Parser, ValueEnum};
use hb_cli_common::{LogFormat, LogLevel};
use std::path::PathBuf;

/// Object-storage enumeration connector.
///
/// Runs one sync: reads a JSON sync payload, lists the selected buckets page
/// by page and delivers every page of descriptors to a sink. The payload is
/// taken from --config, --config-file, or stdin, in that order.
///
/// ## Examples
///
/// Explicit buckets, 500 objects per page:
///   hb-connector --config '{"profile":"prod","region":"eu-west-1","buckets":["logs"],"max_keys":500}'
///
/// Discover every bucket and post pages to a host:
///   echo '{"region":"us-east-1"}' | hb-connector --sink http --callback-url http://localhost:8080/pages
#[derive(Parser, Debug)]
#[command(name = "hb-connector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Sync Payload ===
    /// Sync payload as a JSON string
    #[arg(long, env = "HB_SYNC_CONFIG", conflicts_with = "config_file")]
    pub config: Option<String>,

    /// Path to a file holding the sync payload
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    // === S3 Configuration ===
    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "HB_S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY")]
    pub secret_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    /// Retries for transient listing errors
    #[arg(long, default_value = "3")]
    pub max_retries: u32,

    // === Sync Options ===
    /// Buckets walked at the same time (must be >= 1)
    #[arg(long, default_value = "1", value_parser = parse_positive_usize)]
    pub concurrency: usize,

    // === Sink Options ===
    /// Where pages are delivered
    #[arg(long, value_enum, default_value = "stdout")]
    pub sink: SinkType,

    /// Output format for the stdout sink
    #[arg(long, value_enum, default_value = "jsonl")]
    pub output_format: OutputFormatArg,

    /// Callback URL (required when sink=http)
    #[arg(long, env = "HB_CALLBACK_URL")]
    pub callback_url: Option<String>,

    /// Bearer token for the callback URL
    #[arg(long, env = "HB_CALLBACK_TOKEN")]
    pub callback_token: Option<String>,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

/// Sink type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkType {
    /// Write pages to stdout
    Stdout,
    /// POST pages to a callback URL
    Http,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// JSON Lines (one page per line)
    Jsonl,
    /// Pretty-printed JSON
    Json,
}

impl From<OutputFormatArg> for hb_connector::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Jsonl => hb_connector::OutputFormat::Jsonl,
            OutputFormatArg::Json => hb_connector::OutputFormat::Json,
        }
    }
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}
