//! Bounty-Harvest main entry point
//!
//! This is the command-line interface for the Bounty-Harvest reward harvester.

use anyhow::Context;
use bounty_harvest::config::{load_config_with_hash, validate, Config};
use bounty_harvest::crawler::run_crawl;
use bounty_harvest::output::{print_statistics, JsonFileSink, SinkReport};
use bounty_harvest::{PlatformProfile, RunOutcome};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Bounty-Harvest: reward table harvester for bug-bounty platforms
///
/// Bounty-Harvest walks a platform's public program listing, reads each
/// program's reward table and writes the results to a JSON file named after
/// how the run ended (final, partial or error dump).
#[derive(Parser, Debug)]
#[command(name = "bounty-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A reward table harvester for bug-bounty platforms", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Platform to harvest, overriding the configuration
    #[arg(long)]
    platform: Option<String>,

    /// Directory receiving the artifact, overriding the configuration
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Number of listing pages to walk, overriding the platform default
    #[arg(long)]
    max_pages: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration after command-line overrides")?;

    let profile = PlatformProfile::from_config(&config).context("failed to resolve platform")?;

    if cli.dry_run {
        handle_dry_run(&config, &profile);
        return Ok(());
    }

    handle_crawl(&config, &profile).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bounty_harvest=info,warn"),
            1 => EnvFilter::new("bounty_harvest=debug,info"),
            2 => EnvFilter::new("bounty_harvest=trace,debug"),
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

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(platform) = &cli.platform {
        config.platform.kind = platform.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.to_string_lossy().into_owned();
    }
    if let Some(max_pages) = cli.max_pages {
        config.platform.max_pages = Some(max_pages);
    }
}

fn output_sink(config: &Config, profile: &PlatformProfile) -> JsonFileSink {
    let stem = config
        .output
        .file_stem
        .clone()
        .unwrap_or_else(|| profile.kind.id().to_string());
    JsonFileSink::new(&config.output.directory, stem)
}

/// Handles the --dry-run mode: shows the resolved profile and artifact names
fn handle_dry_run(config: &Config, profile: &PlatformProfile) {
    println!("=== Bounty-Harvest Dry Run ===\n");
    println!("{}", profile.describe());

    println!("\nCrawler:");
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);
    println!("  User agent: {}", config.user_agent.value);

    let sink = output_sink(config, profile);
    println!("\nOutput:");
    for outcome in [
        RunOutcome::CompletedNormally,
        RunOutcome::InterruptedByUser,
        RunOutcome::AbortedOnError,
    ] {
        println!("  {:<12} {}", outcome, sink.artifact_path(outcome).display());
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, profile: &PlatformProfile) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received; finishing the current request");
            interrupt.cancel();
        }
    });

    let sink = output_sink(config, profile);
    let report = run_crawl(config, profile, &sink, cancel)
        .await
        .context("crawl failed")?;

    println!();
    print_statistics(&report.stats, report.elapsed);
    match &report.sink {
        SinkReport::Written { path, count } => {
            println!("\n✓ {} programs saved to {} ({})", count, path.display(), report.outcome);
            if report.outcome.is_partial() {
                println!("  The run did not walk every listing page; results are partial");
            }
        }
        SinkReport::NothingToWrite => {
            println!("\nNo data to save ({} run)", report.outcome);
        }
    }

    Ok(())
}
