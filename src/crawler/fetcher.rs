//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building one HTTP client per proxy with credentials, user agent and timeout
//! - Choosing a proxy per request
//! - Classifying the outcome (success, HTTP error, transport error)
//!
//! A fetch never fails the caller. Every call yields a `FetchResult` and the
//! coordinator decides what an absent body means.

use crate::config::{ProxyCredentials, ProxyEndpoint};
use crate::crawler::proxy::{proxy_url, ProxySelector, RandomProxy};
use crate::{ConfigError, ScoutError};
use reqwest::{Client, Proxy, StatusCode};
use std::error::Error as StdError;
use std::time::Duration;

/// Browser-identifying User-Agent sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Outcome of a single fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// HTTP 200 with the raw response body
    Ok(String),

    /// Any status other than 200
    HttpError(u16),

    /// Timeout, connection failure, proxy failure, or body read failure
    TransportError(String),
}

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// The requested URL
    pub url: String,

    /// What happened
    pub outcome: FetchOutcome,
}

impl FetchResult {
    pub fn new(url: impl Into<String>, outcome: FetchOutcome) -> Self {
        Self {
            url: url.into(),
            outcome,
        }
    }

    /// Returns the body if the fetch succeeded
    pub fn into_body(self) -> Option<String> {
        match self.outcome {
            FetchOutcome::Ok(body) => Some(body),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Ok(_))
    }
}

/// Anything that can turn a URL into a `FetchResult`
///
/// The coordinator is generic over this so that it can be driven by a fake
/// page source in tests.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Builds an HTTP client that routes every request through `endpoint`
///
/// # Arguments
///
/// * `endpoint` - The proxy to route through
/// * `credentials` - Proxy login and password, embedded in the proxy URL
/// * `timeout` - Timeout for the full request/response cycle
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(ScoutError)` - The proxy URL or the client could not be built
///
/// # Example
///
/// ```no_run
/// use repo_scout::config::{ProxyCredentials, ProxyEndpoint, DEFAULT_TIMEOUT};
/// use repo_scout::crawler::build_http_client;
///
/// let endpoint: ProxyEndpoint = "1.2.3.4:8080".parse().unwrap();
/// let credentials = ProxyCredentials::new("login", "password");
/// let client = build_http_client(&endpoint, &credentials, DEFAULT_TIMEOUT).unwrap();
/// ```
pub fn build_http_client(
    endpoint: &ProxyEndpoint,
    credentials: &ProxyCredentials,
    timeout: Duration,
) -> Result<Client, ScoutError> {
    let client_error = |source| ScoutError::Client {
        proxy: endpoint.to_string(),
        source,
    };

    let proxy = Proxy::all(proxy_url(endpoint, credentials)?.as_str()).map_err(client_error)?;

    Client::builder()
        .user_agent(USER_AGENT)
        .proxy(proxy)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(client_error)
}

/// Fetches a URL once with the given client
///
/// # Classification
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 200 | `Ok(body)` |
/// | Any other status | `HttpError(status)` |
/// | Timeout | `TransportError` |
/// | Connection or proxy failure | `TransportError` |
/// | Body read failure | `TransportError` |
///
/// Failures are logged at error level with the URL. Nothing is retried.
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let message = describe_error(&e);
            tracing::error!("Request error: {} for URL: {}", message, url);
            return FetchOutcome::TransportError(message);
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::error!("Error: {} for URL: {}", status.as_u16(), url);
        return FetchOutcome::HttpError(status.as_u16());
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Ok(body),
        Err(e) => {
            let message = describe_error(&e);
            tracing::error!("Request error: {} for URL: {}", message, url);
            FetchOutcome::TransportError(message)
        }
    }
}

/// Flattens a reqwest error and its sources into one line
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return "Request timeout".to_string();
    }

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    if error.is_connect() {
        format!("Connection failed: {}", message)
    } else {
        message
    }
}

/// A client bound to one proxy endpoint
#[derive(Debug, Clone)]
struct ProxiedClient {
    endpoint: ProxyEndpoint,
    client: Client,
}

/// Fetcher that routes each request through a proxy chosen per call
///
/// reqwest binds proxies to clients, so there is one client (and one
/// connection pool) per endpoint. All of them are shared by concurrent
/// fetches.
#[derive(Debug, Clone)]
pub struct HttpFetcher<S = RandomProxy> {
    clients: Vec<ProxiedClient>,
    selector: S,
}

impl HttpFetcher<RandomProxy> {
    /// Creates a fetcher choosing uniformly at random among `endpoints`
    pub fn new(
        endpoints: Vec<ProxyEndpoint>,
        credentials: &ProxyCredentials,
        timeout: Duration,
    ) -> Result<Self, ScoutError> {
        Self::with_selector(endpoints, credentials, timeout, RandomProxy)
    }
}

impl<S: ProxySelector> HttpFetcher<S> {
    /// Creates a fetcher using a custom proxy selection strategy
    pub fn with_selector(
        endpoints: Vec<ProxyEndpoint>,
        credentials: &ProxyCredentials,
        timeout: Duration,
        selector: S,
    ) -> Result<Self, ScoutError> {
        if endpoints.is_empty() {
            return Err(ConfigError::NoProxies.into());
        }

        let clients = endpoints
            .into_iter()
            .map(|endpoint| -> Result<ProxiedClient, ScoutError> {
                let client = build_http_client(&endpoint, credentials, timeout)?;
                Ok(ProxiedClient { endpoint, client })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { clients, selector })
    }

    /// Number of proxies this fetcher can route through
    pub fn proxy_count(&self) -> usize {
        self.clients.len()
    }
}

impl<S: ProxySelector> PageSource for HttpFetcher<S> {
    async fn fetch(&self, url: &str) -> FetchResult {
        let proxied = match self.selector.select(&self.clients) {
            Ok(proxied) => proxied,
            Err(e) => return FetchResult::new(url, FetchOutcome::TransportError(e.to_string())),
        };

        tracing::debug!("Fetching {} via proxy {}", url, proxied.endpoint);
        FetchResult::new(url, fetch_url(&proxied.client, url).await)
    }
}
