use crate::config::types::{CrawlInput, ProxyCredentials};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable holding the proxy login
pub const PROXY_LOGIN_VAR: &str = "PROXY_LOGIN";

/// Environment variable holding the proxy password
pub const PROXY_PASSWORD_VAR: &str = "PROXY_PASSWORD";

/// Loads and validates the crawl input from the given path
///
/// The format is chosen by file extension: `.json` or `.toml`.
///
/// # Arguments
///
/// * `path` - Path to the input file
///
/// # Returns
///
/// * `Ok(CrawlInput)` - Successfully loaded and validated input
/// * `Err(ConfigError)` - Failed to load, parse, or validate the input
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use repo_scout::config::load_input;
///
/// let input = load_input(Path::new("data/input_data.json")).unwrap();
/// println!("Keywords: {:?}", input.keywords);
/// ```
pub fn load_input(path: &Path) -> Result<CrawlInput, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let input: CrawlInput = match extension.as_str() {
        "json" => serde_json::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };

    validate(&input)?;

    Ok(input)
}

/// Computes a SHA-256 hash of the input file content
///
/// Logged at startup so a run can be tied back to the exact input it used.
pub fn compute_input_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads the input and returns it together with its content hash
pub fn load_input_with_hash(path: &Path) -> Result<(CrawlInput, String), ConfigError> {
    let input = load_input(path)?;
    let hash = compute_input_hash(path)?;
    Ok((input, hash))
}

/// Reads proxy credentials from the process environment
///
/// Both `PROXY_LOGIN` and `PROXY_PASSWORD` must be set and non-empty.
pub fn credentials_from_env() -> Result<ProxyCredentials, ConfigError> {
    credentials_from_lookup(|key| std::env::var(key).ok())
}

/// Reads proxy credentials through an arbitrary variable lookup
pub fn credentials_from_lookup<F>(lookup: F) -> Result<ProxyCredentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &'static str| {
        lookup(key)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingCredential(key))
    };

    Ok(ProxyCredentials::new(
        read(PROXY_LOGIN_VAR)?,
        read(PROXY_PASSWORD_VAR)?,
    ))
}
