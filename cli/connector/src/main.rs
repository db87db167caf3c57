//! hb-connector CLI
//!
//! Runs one object-storage enumeration sync and delivers pages to a sink.

use clap::Parser;
use hb_cli_common::{format_count, init_logging};

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr so stdout stays clean for delivered pages
    init_logging(args.log_level, args.log_format)?;

    let stats = run::execute(args).await?;

    eprintln!();
    eprintln!("Sync completed:");
    eprintln!("  Containers:        {}", stats.containers_resolved);
    eprintln!("  Completed:         {}", stats.containers_completed);
    eprintln!("  Failed:            {}", stats.containers_failed);
    eprintln!("  Pages delivered:   {}", format_count(stats.pages_delivered));
    eprintln!("  Objects delivered: {}", format_count(stats.objects_delivered));
    eprintln!("  Rejected pages:    {}", stats.deliveries_rejected);

    if stats.config_defaulted {
        eprintln!("  Warning: sync payload was malformed, defaults were used");
    }
    if stats.cancelled {
        eprintln!("  Cancelled before completion");
    }

    if let Some(duration) = stats.duration() {
        eprintln!(
            "  Duration:          {:.2}s",
            duration.num_milliseconds() as f64 / 1000.0
        );

        if let Some(rate) = stats.objects_per_second() {
            eprintln!("  Throughput:        {:.1} objects/sec", rate);
        }
    }

    if stats.has_errors() || stats.cancelled {
        for error in &stats.errors {
            eprintln!("  Error: {}", error);
        }
        std::process::exit(4); // Partial sync
    }

    Ok(())
}
