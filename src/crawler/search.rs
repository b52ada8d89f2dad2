//! Search page handling
//!
//! This module builds the search URL for a keyword and extracts repository
//! links from the returned search-results page.

use crate::config::SearchType;
use crate::crawler::anomaly::ExtractionAnomaly;
use crate::url::{resolve_repo_href, RepoLinkSet};
use scraper::{Html, Selector};
use url::Url;

/// Container element of one search result's title
pub const SEARCH_TITLE_SELECTOR: &str = "div.search-title";

/// Link inside the title container
pub const RESULT_LINK_SELECTOR: &str = "a";

/// Links and anomalies extracted from one search page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchExtraction {
    /// Canonical repository URLs, deduplicated
    pub links: RepoLinkSet,

    /// Results that were skipped
    pub rejected: Vec<ExtractionAnomaly>,
}

/// Builds the search URL for one keyword
///
/// The keyword is query-encoded; the type is written as its category name.
///
/// # Example
///
/// ```
/// use repo_scout::config::SearchType;
/// use repo_scout::crawler::build_search_url;
/// use url::Url;
///
/// let origin = Url::parse("https://github.com").unwrap();
/// let url = build_search_url(&origin, "raft", SearchType::Repositories).unwrap();
/// assert_eq!(url.as_str(), "https://github.com/search?q=raft&type=Repositories");
/// ```
pub fn build_search_url(
    origin: &Url,
    keyword: &str,
    search_type: SearchType,
) -> Result<Url, url::ParseError> {
    let mut url = origin.join("/search")?;
    url.query_pairs_mut()
        .append_pair("q", keyword.trim())
        .append_pair("type", search_type.as_query_value());
    Ok(url)
}

/// Extracts repository links from a search-results page
///
/// For every search title container, the first anchor's href is read. Only
/// site-relative hrefs are kept (joined onto `origin`); everything else is
/// reported in `rejected`.
///
/// This is a pure function of its inputs.
///
/// # Arguments
///
/// * `html` - The search page HTML
/// * `origin` - The site origin relative links resolve against
pub fn extract_repo_links(html: &str, origin: &Url) -> SearchExtraction {
    let document = Html::parse_document(html);
    let mut extraction = SearchExtraction::default();

    let (Ok(title_selector), Ok(link_selector)) = (
        Selector::parse(SEARCH_TITLE_SELECTOR),
        Selector::parse(RESULT_LINK_SELECTOR),
    ) else {
        return extraction;
    };

    for container in document.select(&title_selector) {
        let href = container
            .select(&link_selector)
            .next()
            .and_then(|link| link.value().attr("href"));

        let Some(href) = href else {
            extraction.rejected.push(ExtractionAnomaly::MissingHref);
            continue;
        };

        match resolve_repo_href(href, origin) {
            Ok(url) => {
                extraction.links.insert(url);
            }
            Err(reason) => extraction.rejected.push(ExtractionAnomaly::RejectedHref {
                href: href.to_string(),
                reason,
            }),
        }
    }

    extraction
}
