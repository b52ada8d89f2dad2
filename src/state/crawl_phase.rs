/// Phase definitions for tracking a crawl run
///
/// A run moves strictly forward: Init → SearchPhase → EnrichPhase → Done.
use crate::ScoutError;
use std::fmt;

/// Represents the current phase of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Run has been set up but no request has been issued
    Init,

    /// Search pages are being fetched and their links collected
    SearchPhase,

    /// Deduplicated repository pages are being fetched and extracted
    EnrichPhase,

    /// All work finished; the report is ready
    Done,
}

impl CrawlPhase {
    /// Returns the phase that follows this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::SearchPhase),
            Self::SearchPhase => Some(Self::EnrichPhase),
            Self::EnrichPhase => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns true if moving from this phase to `to` is allowed
    pub fn can_transition_to(&self, to: Self) -> bool {
        self.next() == Some(to)
    }

    /// Moves to `to`, rejecting anything but the next phase
    pub fn transition(&mut self, to: Self) -> Result<(), ScoutError> {
        if !self.can_transition_to(to) {
            return Err(ScoutError::InvalidTransition { from: *self, to });
        }
        *self = to;
        Ok(())
    }

    /// Returns true once the run is complete
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::SearchPhase => "search",
            Self::EnrichPhase => "enrich",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
