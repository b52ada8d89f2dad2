use crate::config::types::{CrawlInput, CrawlerSettings, ProxyEndpoint};
use crate::ConfigError;
use url::Url;

/// Upper bound on fetches in flight within a phase
pub const MAX_CONCURRENCY: usize = 64;

/// Validates the entire input record
pub fn validate(input: &CrawlInput) -> Result<(), ConfigError> {
    validate_keywords(&input.keywords)?;
    validate_proxies(&input.proxies)?;
    Ok(())
}

/// Validates the search keywords
fn validate_keywords(keywords: &[String]) -> Result<(), ConfigError> {
    if keywords.is_empty() {
        return Err(ConfigError::Validation(
            "keywords must contain at least one entry".to_string(),
        ));
    }

    if let Some(position) = keywords.iter().position(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "keyword at index {} is blank",
            position
        )));
    }

    Ok(())
}

/// Validates the proxy list and returns the parsed endpoints
pub fn validate_proxies(proxies: &[String]) -> Result<Vec<ProxyEndpoint>, ConfigError> {
    if proxies.is_empty() {
        return Err(ConfigError::NoProxies);
    }

    proxies.iter().map(|p| p.parse()).collect()
}

/// Validates command-line crawler settings
pub fn validate_settings(settings: &CrawlerSettings) -> Result<(), ConfigError> {
    if settings.concurrency < 1 || settings.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, settings.concurrency
        )));
    }

    if settings.timeout.is_zero() {
        return Err(ConfigError::Validation(
            "timeout must be greater than zero".to_string(),
        ));
    }

    let origin = Url::parse(&settings.origin)
        .map_err(|e| ConfigError::Validation(format!("Invalid origin '{}': {}", settings.origin, e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "origin '{}' must use http or https",
            settings.origin
        )));
    }

    if origin.path() != "/" || origin.query().is_some() {
        return Err(ConfigError::Validation(format!(
            "origin '{}' must not carry a path or query",
            settings.origin
        )));
    }

    Ok(())
}
