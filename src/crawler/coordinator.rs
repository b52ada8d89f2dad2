//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one run through its phases:
//! - Search: fetch one search page per keyword and collect repository links
//! - Deduplicate the links of all keywords into one set
//! - Enrich: fetch every repository page once and extract its details
//! - Assemble the report and run statistics
//!
//! Fetches within a phase run concurrently up to the configured limit. A
//! failure only ever removes one page's contribution; the run always
//! completes with a (possibly empty) report.

use crate::config::{validate_settings, CrawlInput, CrawlerSettings, SearchType};
use crate::crawler::detail::{extract_detail, RepoRecord};
use crate::crawler::fetcher::PageSource;
use crate::crawler::search::{build_search_url, extract_repo_links, SearchExtraction};
use crate::output::CrawlStatistics;
use crate::state::CrawlPhase;
use crate::url::RepoLinkSet;
use crate::{ConfigError, ScoutError};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use url::Url;

/// One keyword search, resolved to its URL at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: String,
    pub search_type: SearchType,
    pub url: Url,
}

/// Everything a finished run produces
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Enriched repositories, sorted by URL
    pub records: Vec<RepoRecord>,

    /// Counters and timings for the run
    pub stats: CrawlStatistics,
}

/// Result of enriching one repository URL
struct Enrichment {
    record: Option<RepoRecord>,
    anomalies: usize,
}

/// Main crawler coordinator structure
pub struct Coordinator<S> {
    source: S,
    requests: Vec<SearchRequest>,
    origin: Url,
    concurrency: usize,
    phase: CrawlPhase,
}

impl<S: PageSource> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// Search URLs are built here, once. Keywords producing the same search
    /// URL are searched once.
    ///
    /// # Arguments
    ///
    /// * `source` - Where pages are fetched from
    /// * `input` - Keywords and search type
    /// * `settings` - Concurrency limit and site origin
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScoutError)` - The settings or a search URL were invalid
    pub fn new(source: S, input: &CrawlInput, settings: &CrawlerSettings) -> Result<Self, ScoutError> {
        validate_settings(settings)?;

        let origin = Url::parse(&settings.origin)
            .map_err(|e| ConfigError::Validation(format!("Invalid origin: {}", e)))?;

        let mut seen = HashSet::new();
        let mut requests = Vec::with_capacity(input.keywords.len());
        for keyword in &input.keywords {
            let url = build_search_url(&origin, keyword, input.search_type).map_err(|e| {
                ConfigError::Validation(format!("Invalid search URL for '{}': {}", keyword, e))
            })?;

            if !seen.insert(url.clone()) {
                tracing::debug!("Skipping duplicate keyword '{}'", keyword);
                continue;
            }

            requests.push(SearchRequest {
                keyword: keyword.trim().to_string(),
                search_type: input.search_type,
                url,
            });
        }

        Ok(Self {
            source,
            requests,
            origin,
            concurrency: settings.concurrency,
            phase: CrawlPhase::Init,
        })
    }

    /// The search requests this run will issue
    pub fn requests(&self) -> &[SearchRequest] {
        &self.requests
    }

    /// Current phase of the run
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Runs the crawl to completion
    ///
    /// A coordinator runs once; calling this again fails with
    /// `ScoutError::InvalidTransition`.
    pub async fn run(&mut self) -> Result<CrawlReport, ScoutError> {
        let mut stats = CrawlStatistics::started(self.requests.len());

        self.phase.transition(CrawlPhase::SearchPhase)?;
        tracing::info!("Starting {} phase with {} keywords", self.phase, self.requests.len());
        let links = self.search_phase(&mut stats).await;
        tracing::info!(
            "Search phase complete: {} unique repository links from {}/{} search pages",
            links.len(),
            stats.search_pages_fetched,
            stats.keywords
        );

        self.phase.transition(CrawlPhase::EnrichPhase)?;
        tracing::info!("Starting {} phase with {} repositories", self.phase, links.len());
        let records = self.enrich_phase(links, &mut stats).await;

        self.phase.transition(CrawlPhase::Done)?;
        stats.finish();
        tracing::info!(
            "Crawl completed: {} of {} repositories enriched in {:?}",
            stats.repos_enriched,
            stats.links_discovered,
            stats.elapsed()
        );

        Ok(CrawlReport { records, stats })
    }

    /// Fetches every search page and merges their links into one set
    async fn search_phase(&self, stats: &mut CrawlStatistics) -> RepoLinkSet {
        let pages: Vec<Option<SearchExtraction>> = stream::iter(&self.requests)
            .map(|request| self.search_one(request))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut links = RepoLinkSet::new();
        for page in pages {
            match page {
                Some(extraction) => {
                    stats.search_pages_fetched += 1;
                    stats.links_found += extraction.links.len();
                    stats.links_rejected += extraction.rejected.len();
                    links.merge(extraction.links);
                }
                None => stats.search_pages_failed += 1,
            }
        }

        stats.links_discovered = links.len();
        links
    }

    /// Fetches and parses one search page
    async fn search_one(&self, request: &SearchRequest) -> Option<SearchExtraction> {
        let result = self.source.fetch(request.url.as_str()).await;

        let Some(body) = result.into_body() else {
            tracing::warn!("No HTML response for search URL: {}", request.url);
            return None;
        };

        let extraction = extract_repo_links(&body, &self.origin);
        for anomaly in &extraction.rejected {
            tracing::warn!("{} -- {}", anomaly, request.url);
        }

        tracing::info!(
            "Keyword '{}': {} repository links",
            request.keyword,
            extraction.links.len()
        );
        Some(extraction)
    }

    /// Fetches and extracts every repository in the set
    async fn enrich_phase(&self, links: RepoLinkSet, stats: &mut CrawlStatistics) -> Vec<RepoRecord> {
        let enrichments: Vec<Enrichment> = stream::iter(links)
            .map(|url| async move { self.enrich_one(&url).await })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut records = Vec::with_capacity(enrichments.len());
        for enrichment in enrichments {
            stats.extraction_anomalies += enrichment.anomalies;
            match enrichment.record {
                Some(record) => records.push(record),
                None => stats.repos_failed += 1,
            }
        }

        stats.repos_enriched = records.len();
        records.sort_by(|a, b| a.url.cmp(&b.url));
        records
    }

    /// Fetches and extracts one repository page
    async fn enrich_one(&self, url: &str) -> Enrichment {
        let result = self.source.fetch(url).await;

        let Some(body) = result.into_body() else {
            tracing::warn!("No HTML response for URL: {}", url);
            tracing::error!("Failed to extract data for URL: {}", url);
            return Enrichment {
                record: None,
                anomalies: 0,
            };
        };

        let extraction = extract_detail(&body, url);
        for anomaly in &extraction.anomalies {
            tracing::warn!("{} for URL: {}", anomaly, url);
        }

        tracing::info!("Processed {}", url);
        Enrichment {
            record: Some(extraction.record),
            anomalies: extraction.anomalies.len(),
        }
    }
}
