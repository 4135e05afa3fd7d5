//! CLI entry point for the harvester.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use clap::Parser;
use gpc_harvester::{HarvestConfig, Harvester};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Harvester starting");

    let mut config = HarvestConfig::new(args.base_url, args.output);
    config.max_attempts = args.max_retries;

    // Ctrl-C flips the flag; the run stops cleanly between downloads.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_signal = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupted_signal.store(true, Ordering::SeqCst);
        }
    });

    let harvester = Harvester::new(config);
    let summary = harvester.run_with_interrupt(interrupted).await?;

    info!(
        success = summary.success,
        failed = summary.failed,
        already_exists = summary.already_exists,
        invalid = summary.invalid,
        total = summary.total(),
        output_dir = %summary.output_dir.display(),
        "Harvest complete"
    );

    if summary.interrupted {
        warn!("Interrupted. Run again to resume; existing files are skipped.");
    }

    Ok(())
}
