use crate::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of fetches in flight per phase
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Site origin that search URLs and relative repository links resolve against
pub const DEFAULT_ORIGIN: &str = "https://github.com";

/// Input record describing what to search for and how to reach the site
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlInput {
    /// Search keywords, one search page each
    pub keywords: Vec<String>,

    /// Egress proxies as "host:port"
    pub proxies: Vec<String>,

    /// Which search category to query
    #[serde(rename = "type")]
    pub search_type: SearchType,
}

/// Search categories offered by the site's search page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SearchType {
    #[serde(alias = "repositories")]
    Repositories,
    #[serde(alias = "code")]
    Code,
    #[serde(alias = "commits")]
    Commits,
    #[serde(alias = "issues")]
    Issues,
    #[serde(alias = "discussions")]
    Discussions,
    #[serde(alias = "packages")]
    Packages,
    #[serde(alias = "marketplace")]
    Marketplace,
    #[serde(alias = "topics")]
    Topics,
    #[serde(alias = "wikis")]
    Wikis,
    #[serde(alias = "users")]
    Users,
}

impl SearchType {
    /// Value used for the `type` query parameter
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Repositories => "Repositories",
            Self::Code => "Code",
            Self::Commits => "Commits",
            Self::Issues => "Issues",
            Self::Discussions => "Discussions",
            Self::Packages => "Packages",
            Self::Marketplace => "Marketplace",
            Self::Topics => "Topics",
            Self::Wikis => "Wikis",
            Self::Users => "Users",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

/// A forward proxy the crawler may route a request through
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
}

impl FromStr for ProxyEndpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| ConfigError::InvalidProxy(s.to_string()))?;

        if !is_valid_host(host) {
            return Err(ConfigError::InvalidProxy(s.to_string()));
        }

        let port: u16 = port
            .parse()
            .map_err(|_| ConfigError::InvalidProxy(s.to_string()))?;
        if port == 0 {
            return Err(ConfigError::InvalidProxy(s.to_string()));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

/// Accepts a DNS name, an IPv4 address or a bracketed IPv6 address
fn is_valid_host(host: &str) -> bool {
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return inner.contains(':')
            && inner.chars().all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.');
    }

    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Login and password shared by every proxy
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub login: String,
    pub password: String,
}

impl ProxyCredentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs and panic messages
impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Runtime knobs for the crawl, set from the command line
#[derive(Debug, Clone)]
pub struct CrawlerSettings {
    /// Maximum number of fetches in flight within a phase
    pub concurrency: usize,

    /// Timeout for a full request/response cycle
    pub timeout: Duration,

    /// Origin for search URLs and relative repository links
    pub origin: String,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proxy_endpoint() {
        let proxy: ProxyEndpoint = "1.2.3.4:8080".parse().unwrap();
        assert_eq!(proxy.host, "1.2.3.4");
        assert_eq!(proxy.port, 8080);
        assert_eq!(proxy.to_string(), "1.2.3.4:8080");
    }

    #[test]
    fn test_parse_proxy_endpoint_hostname() {
        let proxy: ProxyEndpoint = " proxy.example.com:3128 ".parse().unwrap();
        assert_eq!(proxy.host, "proxy.example.com");
        assert_eq!(proxy.port, 3128);
    }

    #[test]
    fn test_reject_malformed_proxies() {
        for bad in [
            "1.2.3.4",
            ":8080",
            "1.2.3.4:",
            "1.2.3.4:port",
            "1.2.3.4:0",
            "1.2.3.4:70000",
            "u@h:80",
            "host/x:8080",
            "host#frag:8080",
            "host?q:8080",
            "ho st:8080",
            "[zz]:8080",
            "::1:8080",
        ] {
            assert!(
                matches!(bad.parse::<ProxyEndpoint>(), Err(ConfigError::InvalidProxy(_))),
                "expected {} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_bracketed_ipv6_proxy() {
        let proxy: ProxyEndpoint = "[::1]:3128".parse().unwrap();
        assert_eq!(proxy.host, "[::1]");
        assert_eq!(proxy.port, 3128);
        assert_eq!(proxy.to_string(), "[::1]:3128");
    }

    #[test]
    fn test_search_type_aliases() {
        let upper: SearchType = serde_json::from_str("\"Repositories\"").unwrap();
        let lower: SearchType = serde_json::from_str("\"wikis\"").unwrap();
        assert_eq!(upper, SearchType::Repositories);
        assert_eq!(lower, SearchType::Wikis);
        assert!(serde_json::from_str::<SearchType>("\"Nope\"").is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = ProxyCredentials::new("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_default_settings() {
        let settings = CrawlerSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.origin, "https://github.com");
    }
}
