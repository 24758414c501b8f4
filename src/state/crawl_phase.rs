/// Crawl run lifecycle
///
/// A run moves Idle -> Running -> Draining -> Done. A cancelled run jumps
/// from Running straight to Done.
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrawlPhase {
    /// Controller created, request not yet admitted
    #[default]
    Idle,

    /// Frontier is being processed
    Running,

    /// Frontier is exhausted, run is wrapping up
    Draining,

    /// Run finished and the report is final
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Running, Self::Done)
                | (Self::Draining, Self::Done)
        )
    }

    /// Returns true once the run can no longer make progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns a short lowercase name for logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
