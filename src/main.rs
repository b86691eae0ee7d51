//! Shopscrape main entry point
//!
//! This is the command-line interface for the interactive product scraper.

use clap::Parser;
use shopscrape::config::{load_config, Config};
use shopscrape::scrape::{check_connection, HttpFetcher};
use shopscrape::session::{InteractiveSession, StdConsole, TerminationReason};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Shopscrape: an interactive single-page product scraper
///
/// Enter a product listing URL at the prompt. Titles, prices and
/// descriptions are extracted, previewed, and saved as CSV. Failed scrapes
/// are retried with a growing pause between attempts.
#[derive(Parser, Debug)]
#[command(name = "shopscrape")]
#[command(version = "1.0.0")]
#[command(about = "An interactive single-page product scraper", long_about = None)]
struct Cli {
    /// Optional TOML configuration file (built-in defaults otherwise)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the CSV files (overrides the configuration)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Test the connection to a URL and exit
    #[arg(long, value_name = "URL")]
    check: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if let Some(dir) = cli.output_dir {
        config.output.directory = dir;
    }

    if let Some(url) = cli.check {
        return handle_check(&config, &url).await;
    }

    handle_interactive(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shopscrape=info,warn"),
            1 => EnvFilter::new("shopscrape=debug,info"),
            2 => EnvFilter::new("shopscrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --check: one fetch, size and preview, no extraction
async fn handle_check(config: &Config, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Connection test ---");

    let fetcher = HttpFetcher::new(&config.http)?;
    match check_connection(&fetcher, url).await {
        Ok(report) => {
            println!("✓ HTML retrieved - size: {} characters", report.content_length);
            println!("HTML preview: {}...", report.preview);
            Ok(())
        }
        Err(e) => {
            println!("✗ Connection test failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the interactive session until exit, end of input, or Ctrl-C
async fn handle_interactive(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Web scraping system ===");

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            interrupt.cancel();
        }
    });

    let mut session = InteractiveSession::from_config(StdConsole::new(), &config, cancel)?;
    let summary = session.run().await;

    tracing::info!(
        "Session ended ({:?}) after {} successful runs",
        summary.reason,
        summary.successful_runs
    );

    if summary.reason == TerminationReason::Interrupted {
        // A pending stdin read lives on a blocking thread that the runtime
        // would wait for on shutdown
        std::process::exit(130);
    }
    Ok(())
}
