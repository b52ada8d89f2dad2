use crate::UrlError;
use std::fmt;

/// A recoverable problem found while extracting data from a page
///
/// Extractors return these alongside their best-effort result; the
/// coordinator logs them as warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionAnomaly {
    /// A search result link was not a site-relative path
    RejectedHref { href: String, reason: UrlError },

    /// A search result container had no anchor with an href
    MissingHref,

    /// The repository page has no author link
    MissingOwner,

    /// A language entry could not be read and was skipped
    MalformedLanguage {
        language: Option<String>,
        reason: String,
    },
}

impl fmt::Display for ExtractionAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RejectedHref { href, reason } => {
                write!(f, "Invalid link format, skipped: {} ({})", href, reason)
            }
            Self::MissingHref => write!(f, "Search result without a link, skipped"),
            Self::MissingOwner => write!(f, "Owner not found"),
            Self::MalformedLanguage {
                language: Some(language),
                reason,
            } => write!(f, "Language entry '{}' skipped: {}", language, reason),
            Self::MalformedLanguage {
                language: None,
                reason,
            } => write!(f, "Language entry skipped: {}", reason),
        }
    }
}
