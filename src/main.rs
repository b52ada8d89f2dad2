//! Repo-Scout main entry point
//!
//! This is the command-line interface for the Repo-Scout repository crawler.

use anyhow::Context;
use clap::Parser;
use repo_scout::config::{
    credentials_from_env, load_input_with_hash, validate_settings, CrawlInput, CrawlerSettings,
    DEFAULT_CONCURRENCY, DEFAULT_ORIGIN,
};
use repo_scout::crawler::{build_search_url, crawl};
use repo_scout::output::{print_statistics, write_report};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Repo-Scout: a proxied repository discovery crawler
///
/// Repo-Scout searches for repositories matching the configured keywords,
/// then visits each repository once to record its owner and language
/// breakdown. Requests go through the configured proxies using the
/// PROXY_LOGIN and PROXY_PASSWORD credentials.
#[derive(Parser, Debug)]
#[command(name = "repo-scout")]
#[command(version = "1.0.0")]
#[command(about = "A proxied repository discovery crawler", long_about = None)]
struct Cli {
    /// Path to the JSON or TOML input file
    #[arg(value_name = "INPUT", default_value = "data/input_data.json")]
    input: PathBuf,

    /// Where to write the JSON report
    #[arg(short, long, value_name = "FILE", default_value = "data/output_data.json")]
    output: PathBuf,

    /// Log file that every run appends to
    #[arg(long, value_name = "FILE", default_value = "data/logs.log")]
    log_file: PathBuf,

    /// Maximum number of fetches in flight
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 10)]
    timeout: u64,

    /// Site origin for search URLs and repository links
    #[arg(long, value_name = "URL", default_value = DEFAULT_ORIGIN)]
    origin: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output on stderr
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate input and show the search URLs without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine; the variables may come from the environment
    let _ = dotenvy::dotenv();

    let (dispatch, _guard) = setup_logging(cli.verbose, cli.quiet, &cli.log_file)?;

    run(cli).with_subscriber(dispatch).await
}

/// Builds the logging pipeline for one run
///
/// Events go to two places: the log file, appended to on every run, and
/// stderr filtered by verbosity. The subscriber is returned rather than
/// installed globally; the returned guard flushes the file on drop.
fn setup_logging(verbose: u8, quiet: bool, log_file: &Path) -> anyhow::Result<(Dispatch, WorkerGuard)> {
    let terminal_filter = if quiet {
        // Only show errors
        "error"
    } else {
        match verbose {
            0 => "repo_scout=info,warn",
            1 => "repo_scout=debug,info",
            2 => "repo_scout=trace,debug",
            _ => "trace",
        }
    };
    let file_filter = if verbose == 0 { "repo_scout=info,warn" } else { terminal_filter };

    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", log_file.display()))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(file_filter));

    let terminal_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(EnvFilter::new(terminal_filter));

    let subscriber = tracing_subscriber::registry().with(file_layer).with(terminal_layer);

    Ok((Dispatch::new(subscriber), guard))
}

/// Loads the input and dispatches to dry-run or crawl mode
async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!("Loading input from: {}", cli.input.display());
    let input = match load_input_with_hash(&cli.input) {
        Ok((input, hash)) => {
            tracing::info!("Input loaded successfully (hash: {})", hash);
            input
        }
        Err(e) => {
            tracing::error!("Failed to load input: {}", e);
            return Err(e.into());
        }
    };

    let settings = CrawlerSettings {
        concurrency: cli.concurrency,
        timeout: Duration::from_secs(cli.timeout),
        origin: cli.origin.clone(),
    };
    if let Err(e) = validate_settings(&settings) {
        tracing::error!("Invalid settings: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&input, &settings)
    } else {
        handle_crawl(&input, &settings, &cli.output).await
    }
}

/// Handles the --dry-run mode: shows what would be fetched
fn handle_dry_run(input: &CrawlInput, settings: &CrawlerSettings) -> anyhow::Result<()> {
    println!("=== Repo-Scout Dry Run ===\n");

    println!("Crawler Settings:");
    println!("  Concurrency: {}", settings.concurrency);
    println!("  Timeout: {}s", settings.timeout.as_secs());
    println!("  Origin: {}", settings.origin);
    println!("  Search type: {}", input.search_type);

    println!("\nProxies ({}):", input.proxies.len());
    for proxy in &input.proxies {
        println!("  - {}", proxy);
    }

    let origin = url::Url::parse(&settings.origin)?;
    println!("\nSearch URLs ({}):", input.keywords.len());
    for keyword in &input.keywords {
        println!("  - {}", build_search_url(&origin, keyword, input.search_type)?);
    }

    println!("\n✓ Input is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(input: &CrawlInput, settings: &CrawlerSettings, output: &Path) -> anyhow::Result<()> {
    let credentials = match credentials_from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Keywords: {}, proxies: {}, type: {}",
        input.keywords.len(),
        input.proxies.len(),
        input.search_type
    );

    let report = match crawl(input, &credentials, settings).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    write_report(&report.records, output)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;
    tracing::info!("Results saved to '{}'", output.display());

    print_statistics(&report.stats);
    Ok(())
}
