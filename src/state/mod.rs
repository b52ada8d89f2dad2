//! State module for tracking crawl progress
//!
//! A crawl run is a small forward-only state machine. The coordinator holds
//! a `CrawlPhase` and advances it as each phase completes, so enrichment can
//! never start before the search phase and its deduplication have finished.

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
