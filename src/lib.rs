//! Repo-Scout: a proxied repository discovery crawler
//!
//! This crate searches a code-hosting site for repositories matching a set of
//! keywords, then visits each repository page once to collect its owner and
//! language breakdown. All requests are routed through a pool of
//! authenticated HTTP proxies.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Repo-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client for proxy {proxy}: {source}")]
    Client {
        proxy: String,
        source: reqwest::Error,
    },

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Configuration-specific errors
///
/// Every variant is fatal and is raised before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML input: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported input format: {0} (expected .json or .toml)")]
    UnsupportedFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid proxy '{0}': expected host:port")]
    InvalidProxy(String),

    #[error("Proxy list is empty")]
    NoProxies,

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(&'static str),
}

/// Reasons a repository href is not accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Empty href")]
    Empty,

    #[error("Not a site-relative path: {0}")]
    NotRelative(String),

    #[error("Malformed href: {0}")]
    Malformed(String),
}

/// Result type alias for Repo-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{CrawlInput, ProxyCredentials, ProxyEndpoint, SearchType};
pub use crawler::{Coordinator, CrawlReport, RepoRecord};
pub use state::CrawlPhase;
