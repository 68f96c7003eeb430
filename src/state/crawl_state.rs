/// Crawl loop state definitions
///
/// This module defines the pagination cursor carried through a run and the
/// phases the crawl loop moves through.
use crate::crawler::FetchFailure;
use crate::state::{PageResult, PaperRecord};
use std::fmt;

/// Pagination cursor and accumulator for one run
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    /// Number of entries to skip before the next page's first entry
    pub offset: u32,

    /// Records collected so far, in fetch order then document order
    pub accumulated: Vec<PaperRecord>,

    /// Listing pages fetched successfully
    pub page_count: u32,
}

impl CrawlState {
    /// Creates the initial state: offset 0, nothing accumulated
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a parsed page into the accumulator
    pub fn absorb(&mut self, page: PageResult) {
        self.accumulated.extend(page.records);
    }

    /// Moves the cursor to the next page; saturates at `u32::MAX`
    pub fn advance(&mut self, page_size: u32) {
        self.offset = self.offset.saturating_add(page_size);
    }
}

/// Phase of the crawl loop
#[derive(Debug)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// About to request the page at the current offset
    Fetching,

    /// Holding a fetched document that has not been parsed yet
    Parsing(String),

    // ===== Terminal Phases =====
    /// Listing exhausted or page limit reached
    Done,

    /// A listing request failed; partial results are kept
    Failed(FetchFailure),
}

impl CrawlPhase {
    /// Returns true if the loop must stop in this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Parsing(_) => "parsing",
            Self::Done => "done",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
