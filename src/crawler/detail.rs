//! Repository page extraction
//!
//! Reads the owner and the language bar from a repository page. Extraction is
//! best-effort: a missing owner becomes a sentinel and unreadable language
//! entries are skipped one by one, each reported as an anomaly.

use crate::crawler::anomaly::ExtractionAnomaly;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Author link carrying the repository owner
pub const OWNER_SELECTOR: &str = r#"a[rel~="author"]"#;

/// One entry of the inline language bar
pub const LANGUAGE_ENTRY_SELECTOR: &str = "li.d-inline";

/// Bold label holding the language name inside an entry
pub const LANGUAGE_LABEL_SELECTOR: &str = "span.color-fg-default.text-bold.mr-1";

/// Owner value used when the page has no author link
pub const OWNER_NOT_FOUND: &str = "Not found";

/// Name of the catch-all language bucket
pub const OTHER_LANGUAGE: &str = "Other";

/// Language name to percentage text, e.g. "Go" → "80.0"
pub type LanguageStats = BTreeMap<String, String>;

/// Details collected from one repository page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoExtra {
    pub owner: String,
    pub language_stats: LanguageStats,
}

/// One enriched repository, as written to the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    pub url: String,
    pub extra: RepoExtra,
}

impl RepoRecord {
    pub fn owner(&self) -> &str {
        &self.extra.owner
    }

    pub fn language_stats(&self) -> &LanguageStats {
        &self.extra.language_stats
    }
}

/// A record plus whatever could not be read on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailExtraction {
    pub record: RepoRecord,
    pub anomalies: Vec<ExtractionAnomaly>,
}

/// Parses a repository page into a `RepoRecord`
///
/// # Owner
///
/// Trimmed text of the first author link, or `"Not found"` when there is
/// none. A present link with blank text yields an empty owner.
///
/// # Language statistics
///
/// For every language bar entry the name comes from the bold label. The
/// percentage is read by position, and the catch-all `"Other"` bucket is
/// laid out differently from named languages:
///
/// | Entry | Percentage source |
/// |-------|-------------------|
/// | `Other` | last line of the first span's text |
/// | any other | text of the second span |
///
/// In both cases surrounding whitespace and the `%` sign are removed. The
/// remaining text is kept verbatim; an entry whose value is not a decimal
/// number is skipped.
///
/// This is a pure function of its inputs.
///
/// # Example
///
/// ```
/// use repo_scout::crawler::extract_detail;
///
/// let html = r#"<a rel="author" href="/alice">alice</a>
///     <ul><li class="d-inline"><a href="/alice/x/search?l=go">
///         <span class="color-fg-default text-bold mr-1">Go</span>
///         <span>80.0%</span>
///     </a></li></ul>"#;
/// let extraction = extract_detail(html, "https://github.com/alice/x");
/// assert_eq!(extraction.record.owner(), "alice");
/// assert_eq!(extraction.record.language_stats()["Go"], "80.0");
/// ```
pub fn extract_detail(html: &str, url: &str) -> DetailExtraction {
    let document = Html::parse_document(html);
    let mut anomalies = Vec::new();

    let owner = extract_owner(&document).unwrap_or_else(|| {
        anomalies.push(ExtractionAnomaly::MissingOwner);
        OWNER_NOT_FOUND.to_string()
    });

    let language_stats = extract_language_stats(&document, &mut anomalies);

    DetailExtraction {
        record: RepoRecord {
            url: url.to_string(),
            extra: RepoExtra {
                owner,
                language_stats,
            },
        },
        anomalies,
    }
}

/// Extracts the owner from the author link
fn extract_owner(document: &Html) -> Option<String> {
    let selector = Selector::parse(OWNER_SELECTOR).ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element_text(&element).trim().to_string())
}

/// Extracts every readable language bar entry
fn extract_language_stats(document: &Html, anomalies: &mut Vec<ExtractionAnomaly>) -> LanguageStats {
    let mut stats = LanguageStats::new();

    let (Ok(entry_selector), Ok(label_selector), Ok(span_selector)) = (
        Selector::parse(LANGUAGE_ENTRY_SELECTOR),
        Selector::parse(LANGUAGE_LABEL_SELECTOR),
        Selector::parse("span"),
    ) else {
        return stats;
    };

    for entry in document.select(&entry_selector) {
        match read_language_entry(&entry, &label_selector, &span_selector) {
            Ok((language, percentage)) => {
                stats.insert(language, percentage);
            }
            Err(anomaly) => anomalies.push(anomaly),
        }
    }

    stats
}

/// Reads one language bar entry into `(name, percentage)`
fn read_language_entry(
    entry: &ElementRef<'_>,
    label_selector: &Selector,
    span_selector: &Selector,
) -> Result<(String, String), ExtractionAnomaly> {
    let malformed = |language: Option<&str>, reason: &str| ExtractionAnomaly::MalformedLanguage {
        language: language.map(String::from),
        reason: reason.to_string(),
    };

    let language = entry
        .select(label_selector)
        .next()
        .map(|label| element_text(&label).trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| malformed(None, "no language label"))?;

    let spans: Vec<ElementRef<'_>> = entry.select(span_selector).collect();

    // "Other" has no link wrapper, so its first span encloses label and value
    let value = if language == OTHER_LANGUAGE {
        spans.first().map(|span| {
            let text = element_text(span);
            text.trim()
                .split('\n')
                .last()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
    } else {
        spans.get(1).map(|span| element_text(span).trim().to_string())
    };
    let raw = value.ok_or_else(|| malformed(Some(language.as_str()), "no percentage span"))?;

    let percentage = raw.replace('%', "").trim().to_string();
    if !is_percentage(&percentage) {
        return Err(malformed(
            Some(language.as_str()),
            &format!("unexpected percentage text '{}'", raw),
        ));
    }

    Ok((language, percentage))
}

/// True for plain decimal text such as "80.0", "7" or "0.1"
fn is_percentage(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| c.is_ascii_digit() || c == '.')
        && value.chars().filter(|&c| c == '.').count() <= 1
        && value.chars().any(|c| c.is_ascii_digit())
}

/// Concatenates all descendant text of an element
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}
