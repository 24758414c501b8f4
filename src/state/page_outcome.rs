/// Per-page outcome definitions
///
/// Every URL the controller dequeues and does not skip ends in exactly one
/// of these outcomes.
use std::fmt;

/// Represents what happened to a page during the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// Page was fetched, extracted and persisted
    Stored,

    /// Page was fetched and extracted but its aggregate could not be written
    PersistFailed,

    /// Page could not be fetched; nothing extracted, no links followed
    FetchFailed,

    /// Run was cancelled while the page was being fetched
    Abandoned,
}

impl PageOutcome {
    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::PersistFailed | Self::FetchFailed)
    }

    /// Returns true if the page counts towards the visited set
    ///
    /// Abandoned pages were never fully processed.
    pub fn counts_as_visited(&self) -> bool {
        !matches!(self, Self::Abandoned)
    }

    /// Converts the outcome to its report string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::PersistFailed => "persist_failed",
            Self::FetchFailed => "fetch_failed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
