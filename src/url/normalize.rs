use crate::UrlError;
use url::Url;

/// Resolves a repository href from a search page against the site origin
///
/// # Rules
///
/// 1. Trim surrounding whitespace; reject if empty
/// 2. Only site-relative paths are accepted: the href must start with a
///    single `/`. Absolute URLs and protocol-relative `//host/...` hrefs are
///    rejected without any attempt to canonicalize them
/// 3. Join onto the origin; the result must stay on the origin's host and port
/// 4. Remove the fragment
/// 5. Remove a trailing slash (except for root /)
///
/// # Arguments
///
/// * `href` - The raw href attribute value
/// * `origin` - The site origin, e.g. `https://github.com`
///
/// # Returns
///
/// * `Ok(String)` - Absolute repository URL
/// * `Err(UrlError)` - The href was rejected
///
/// # Examples
///
/// ```
/// use repo_scout::url::resolve_repo_href;
/// use url::Url;
///
/// let origin = Url::parse("https://github.com").unwrap();
/// let url = resolve_repo_href("/org/repo", &origin).unwrap();
/// assert_eq!(url, "https://github.com/org/repo");
/// ```
pub fn resolve_repo_href(href: &str, origin: &Url) -> Result<String, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    if !href.starts_with('/') || href.starts_with("//") {
        return Err(UrlError::NotRelative(href.to_string()));
    }

    let mut url = origin
        .join(href)
        .map_err(|e| UrlError::Malformed(format!("{}: {}", href, e)))?;

    // Backslashes are path separators for http(s), so "/\host" can still escape
    if url.host_str() != origin.host_str() || url.port_or_known_default() != origin.port_or_known_default() {
        return Err(UrlError::NotRelative(href.to_string()));
    }

    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(if trimmed.is_empty() { "/" } else { &trimmed });
    }

    Ok(url.to_string())
}
