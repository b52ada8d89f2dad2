//! Output module for crawl reports
//!
//! This module handles:
//! - Writing the repository report as JSON
//! - Recording and displaying crawl statistics

mod json;
pub mod stats;

pub use json::{render_report, write_report};
pub use stats::{print_statistics, CrawlStatistics};
