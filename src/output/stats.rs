//! Crawl run statistics
//!
//! Counters filled in by the coordinator as each phase completes, and a
//! plain-text rendering for the terminal.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Crawl statistics summary
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished, once it has
    pub finished_at: Option<DateTime<Utc>>,

    /// Distinct keyword searches issued
    pub keywords: usize,

    /// Search pages that returned a body
    pub search_pages_fetched: usize,

    /// Search pages that did not
    pub search_pages_failed: usize,

    /// Links accepted per page, summed before cross-keyword deduplication
    pub links_found: usize,

    /// Links skipped because they were not site-relative
    pub links_rejected: usize,

    /// Unique repository URLs carried into the enrich phase
    pub links_discovered: usize,

    /// Repositories that produced a record
    pub repos_enriched: usize,

    /// Repositories dropped because their page could not be fetched
    pub repos_failed: usize,

    /// Missing owners and skipped language entries
    pub extraction_anomalies: usize,
}

impl CrawlStatistics {
    /// Starts a new set of counters timestamped now
    pub fn started(keywords: usize) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            keywords,
            search_pages_fetched: 0,
            search_pages_failed: 0,
            links_found: 0,
            links_rejected: 0,
            links_discovered: 0,
            repos_enriched: 0,
            repos_failed: 0,
            extraction_anomalies: 0,
        }
    }

    /// Marks the run finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Time from start to finish, or to now if still running
    pub fn elapsed(&self) -> Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }

    /// Share of discovered repositories that were enriched, in percent
    pub fn success_rate(&self) -> f64 {
        if self.links_discovered == 0 {
            0.0
        } else {
            (self.repos_enriched as f64 / self.links_discovered as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Search Phase:");
    println!("  Keywords searched: {}", stats.keywords);
    println!(
        "  Search pages: {} fetched, {} failed",
        stats.search_pages_fetched, stats.search_pages_failed
    );
    println!("  Links found: {}", stats.links_found);
    println!("  Links rejected: {}", stats.links_rejected);
    println!("  Unique repositories: {}", stats.links_discovered);
    println!();

    println!("Enrich Phase:");
    println!("  Repositories enriched: {}", stats.repos_enriched);
    println!("  Repositories failed: {}", stats.repos_failed);
    println!("  Extraction anomalies: {}", stats.extraction_anomalies);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} repositories enriched)",
        stats.success_rate(),
        stats.repos_enriched,
        stats.links_discovered
    );
    println!(
        "Duration: {:.1}s",
        stats.elapsed().num_milliseconds() as f64 / 1000.0
    );
}
