//! Configuration module for Repo-Scout
//!
//! This module handles loading and validating the crawl input (keywords,
//! proxies, search type), reading proxy credentials from the environment,
//! and the runtime crawler settings.
//!
//! # Example
//!
//! ```no_run
//! use repo_scout::config::{credentials_from_env, load_input};
//! use std::path::Path;
//!
//! let input = load_input(Path::new("data/input_data.json")).unwrap();
//! let credentials = credentials_from_env().unwrap();
//! println!("{} keywords, proxy login {}", input.keywords.len(), credentials.login);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlInput, CrawlerSettings, ProxyCredentials, ProxyEndpoint, SearchType, DEFAULT_CONCURRENCY,
    DEFAULT_ORIGIN, DEFAULT_TIMEOUT,
};

// Re-export parser functions
pub use parser::{
    compute_input_hash, credentials_from_env, credentials_from_lookup, load_input,
    load_input_with_hash, PROXY_LOGIN_VAR, PROXY_PASSWORD_VAR,
};
pub use validation::{validate_proxies, validate_settings, MAX_CONCURRENCY};
