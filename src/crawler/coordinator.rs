//! Crawl coordinator - pagination loop
//!
//! This module contains the loop that pages through a listing:
//! - Fetching each page through an injected [`PageFetcher`]
//! - Parsing it through an injected [`ListingParser`]
//! - Accumulating records in order
//! - Deciding when to stop (short page, page limit, or fetch failure)

use crate::config::ListingConfig;
use crate::crawler::fetcher::{FetchFailure, PageFetcher};
use crate::crawler::parser::ListingParser;
use crate::state::{CrawlPhase, CrawlState, PaperRecord};
use std::fmt;

/// Pagination settings for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Offset increment between pages
    pub page_size: u32,

    /// Maximum number of listing pages fetched in one run
    pub max_pages: u32,
}

impl From<&ListingConfig> for CrawlSettings {
    fn from(listing: &ListingConfig) -> Self {
        Self {
            page_size: listing.page_size,
            max_pages: listing.max_pages,
        }
    }
}

/// Why the crawl loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The last page was short or empty
    Exhausted,

    /// `max_pages` pages were fetched and the last one still looked full
    PageLimit,

    /// A listing request failed; records before it are kept
    TransportFailure(FetchFailure),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "listing exhausted"),
            Self::PageLimit => write!(f, "page limit reached"),
            Self::TransportFailure(failure) => write!(f, "fetch failed: {}", failure),
        }
    }
}

/// Result of a crawl: whatever was collected, and why it stopped
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Records in fetch order, then document order within a page
    pub records: Vec<PaperRecord>,

    /// Listing pages fetched successfully
    pub pages_fetched: u32,

    /// Entries dropped for lacking a title or identifier, over all pages
    pub entries_skipped: usize,

    /// Records whose abstract could not be fetched (enrichment only)
    pub abstracts_missing: usize,

    pub stop_reason: StopReason,
}

impl CrawlOutcome {
    /// True unless the crawl ended on a fetch failure
    pub fn is_complete(&self) -> bool {
        !matches!(self.stop_reason, StopReason::TransportFailure(_))
    }

    /// The failure that ended the crawl, if any
    pub fn failure(&self) -> Option<&FetchFailure> {
        match &self.stop_reason {
            StopReason::TransportFailure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Counters kept alongside the state during one run
#[derive(Debug, Default)]
struct RunTally {
    skipped: usize,
    hit_page_limit: bool,
}

/// Drives a [`PageFetcher`] and a [`ListingParser`] over successive offsets
///
/// # State Machine
///
/// | From | Event | To |
/// |------|-------|----|
/// | Fetching | document fetched | Parsing |
/// | Fetching | fetch failed | Failed |
/// | Parsing | `has_more`, below page limit | Fetching (offset += page size) |
/// | Parsing | `has_more`, page limit reached | Done |
/// | Parsing | no more pages | Done |
pub struct Coordinator<F, P> {
    fetcher: F,
    parser: P,
    settings: CrawlSettings,
}

impl<F: PageFetcher, P: ListingParser> Coordinator<F, P> {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of raw listing documents
    /// * `parser` - Turns a document into records
    /// * `settings` - Page size and page limit
    pub fn new(fetcher: F, parser: P, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            parser,
            settings,
        }
    }

    /// Mutable access to the fetcher, for follow-up requests sharing its pacing
    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }

    /// Runs the pagination loop from offset 0
    ///
    /// Never fails as a whole: a fetch failure ends the loop and is reported
    /// in [`CrawlOutcome::stop_reason`] next to the records gathered before it.
    pub async fn run(&mut self) -> CrawlOutcome {
        let mut state = CrawlState::new();
        let mut tally = RunTally::default();
        let mut phase = CrawlPhase::Fetching;

        tracing::info!(
            "Starting listing crawl (page size {}, at most {} pages)",
            self.settings.page_size,
            self.settings.max_pages
        );

        while !phase.is_terminal() {
            phase = match phase {
                CrawlPhase::Fetching => self.fetch_page(&mut state).await,
                CrawlPhase::Parsing(document) => self.parse_page(&mut state, &document, &mut tally),
                terminal => terminal,
            };
        }

        let stop_reason = match phase {
            CrawlPhase::Failed(failure) => StopReason::TransportFailure(failure),
            _ if tally.hit_page_limit => StopReason::PageLimit,
            _ => StopReason::Exhausted,
        };

        tracing::info!(
            "Crawl finished ({}): {} papers from {} pages",
            stop_reason,
            state.accumulated.len(),
            state.page_count
        );

        CrawlOutcome {
            records: state.accumulated,
            pages_fetched: state.page_count,
            entries_skipped: tally.skipped,
            abstracts_missing: 0,
            stop_reason,
        }
    }

    async fn fetch_page(&mut self, state: &mut CrawlState) -> CrawlPhase {
        tracing::debug!("Fetching listing page at offset {}", state.offset);

        match self.fetcher.fetch(state.offset).await {
            Ok(document) => {
                state.page_count += 1;
                CrawlPhase::Parsing(document)
            }
            Err(failure) => {
                tracing::warn!(
                    "Listing fetch at offset {} failed, keeping {} papers: {}",
                    state.offset,
                    state.accumulated.len(),
                    failure
                );
                CrawlPhase::Failed(failure)
            }
        }
    }

    fn parse_page(&self, state: &mut CrawlState, document: &str, tally: &mut RunTally) -> CrawlPhase {
        let page = self.parser.parse(document);
        let has_more = page.has_more;

        tracing::info!(
            "Page {} (offset {}): {} papers, {} entries skipped",
            state.page_count,
            state.offset,
            page.records.len(),
            page.skipped
        );

        tally.skipped += page.skipped;
        state.absorb(page);

        if !has_more {
            return CrawlPhase::Done;
        }

        if state.page_count >= self.settings.max_pages {
            tracing::warn!(
                "Stopping after {} pages although the last page looked full",
                state.page_count
            );
            tally.hit_page_limit = true;
            return CrawlPhase::Done;
        }

        state.advance(self.settings.page_size);
        CrawlPhase::Fetching
    }
}
