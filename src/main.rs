//! arxiv-snapshot main entry point
//!
//! This is the command-line interface for the arxiv-snapshot listing crawler.

use arxiv_snapshot::config::{read_config, validate, Config};
use arxiv_snapshot::crawler::{crawl, listing_url};
use arxiv_snapshot::output::{print_statistics, write_snapshot, RunStatistics};
use arxiv_snapshot::SnapshotError;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// arxiv-snapshot: a polite preprint listing snapshotter
///
/// arxiv-snapshot pages through the recent-submissions listing of one arXiv
/// category, one throttled request at a time, and writes every paper it
/// finds to a JSON file and a plain-text report.
#[derive(Parser, Debug)]
#[command(name = "arxiv-snapshot")]
#[command(version = "1.0.0")]
#[command(about = "A polite preprint listing snapshotter", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the first listing URL without fetching
    #[arg(long)]
    dry_run: bool,

    /// Fetch each paper's abstract page after the listing crawl
    #[arg(long)]
    abstracts: bool,

    /// Override the JSON output path
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Override the text report path
    #[arg(long, value_name = "PATH")]
    text: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match resolve_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_snapshot(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("arxiv_snapshot=info,warn"),
            1 => EnvFilter::new("arxiv_snapshot=debug,info"),
            2 => EnvFilter::new("arxiv_snapshot=trace,debug"),
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

/// Loads the config file (if any), applies command-line overrides, validates
fn resolve_config(cli: &Cli) -> Result<Config, SnapshotError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            read_config(path)?
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.abstracts {
        config.listing.fetch_abstracts = true;
    }
    if let Some(path) = &cli.json {
        config.output.json_path = path.display().to_string();
    }
    if let Some(path) = &cli.text {
        config.output.text_path = path.display().to_string();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) -> Result<(), SnapshotError> {
    println!("=== arxiv-snapshot Dry Run ===\n");

    println!("Listing:");
    println!("  Base URL: {}", config.listing.base_url);
    println!("  Category: {}", config.listing.category_label);
    println!("  Page size: {}", config.listing.page_size);
    println!("  Max pages: {}", config.listing.max_pages);
    println!("  Request delay: {}ms", config.listing.request_delay_ms);
    println!(
        "  Abstracts: {}",
        if config.listing.fetch_abstracts {
            format!("yes (from {})", config.listing.abstract_base_url)
        } else {
            "no".to_string()
        }
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  JSON: {}", config.output.json_path);
    println!("  Text: {}", config.output.text_path);
    println!("  Authors per paper: {}", config.output.text_author_limit);

    let first = listing_url(&config.listing.base_url, 0, config.listing.page_size)?;

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", first);

    Ok(())
}

/// Handles the snapshot run: crawl, write, summarize
async fn handle_snapshot(config: &Config) -> Result<(), SnapshotError> {
    let outcome = crawl(config).await?;

    // An empty run would overwrite the previous snapshot with nothing
    let written = if outcome.records.is_empty() {
        tracing::warn!("No papers collected, leaving output files untouched");
        Vec::new()
    } else {
        write_snapshot(
            &outcome.records,
            &config.output,
            &config.listing.category_label,
        )
    };

    let stats = RunStatistics::collect(&outcome, &written);
    println!();
    print_statistics(&stats);

    if let Some(result) = written.into_iter().find_map(|w| w.result.err()) {
        return Err(result.into());
    }
    if let Some(failure) = outcome.failure() {
        return Err(failure.clone().into());
    }

    Ok(())
}
