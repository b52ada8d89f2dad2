//! Crawler module for repository discovery
//!
//! This module contains the core crawling logic, including:
//! - Proxy selection per request
//! - Proxied HTTP fetching with outcome classification
//! - Search page link extraction
//! - Repository page detail extraction
//! - Two-phase crawl coordination

mod anomaly;
mod coordinator;
mod detail;
mod fetcher;
mod proxy;
mod search;

pub use anomaly::ExtractionAnomaly;
pub use coordinator::{Coordinator, CrawlReport, SearchRequest};
pub use detail::{
    extract_detail, DetailExtraction, LanguageStats, RepoExtra, RepoRecord, OWNER_NOT_FOUND,
};
pub use fetcher::{
    build_http_client, fetch_url, FetchOutcome, FetchResult, HttpFetcher, PageSource, USER_AGENT,
};
pub use proxy::{proxy_url, ProxySelector, RandomProxy};
pub use search::{build_search_url, extract_repo_links, SearchExtraction};

use crate::config::{validate_proxies, CrawlInput, CrawlerSettings, ProxyCredentials};
use crate::ScoutError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Parse the proxy list
/// 2. Build one HTTP client per proxy
/// 3. Search every keyword and deduplicate the repository links
/// 4. Enrich every repository
///
/// # Arguments
///
/// * `input` - Keywords, proxies and search type
/// * `credentials` - Proxy login and password
/// * `settings` - Concurrency, timeout and origin
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (individual page failures are not errors)
/// * `Err(ScoutError)` - The crawl could not be set up
///
/// # Example
///
/// ```no_run
/// use repo_scout::config::{credentials_from_env, load_input, CrawlerSettings};
/// use repo_scout::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let input = load_input(Path::new("data/input_data.json"))?;
/// let credentials = credentials_from_env()?;
/// let report = crawl(&input, &credentials, &CrawlerSettings::default()).await?;
/// println!("{} repositories", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    input: &CrawlInput,
    credentials: &ProxyCredentials,
    settings: &CrawlerSettings,
) -> Result<CrawlReport, ScoutError> {
    let endpoints = validate_proxies(&input.proxies)?;
    let fetcher = HttpFetcher::new(endpoints, credentials, settings.timeout)?;

    tracing::debug!("Built {} proxied clients", fetcher.proxy_count());

    let mut coordinator = Coordinator::new(fetcher, input, settings)?;
    coordinator.run().await
}
