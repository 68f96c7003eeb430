//! State management for a snapshot run
//!
//! This module defines:
//! - Paper records and per-page parse results
//! - The crawl cursor and the phases of the crawl loop

mod crawl_state;
mod paper;

pub use crawl_state::{CrawlPhase, CrawlState};
pub use paper::{PageResult, PaperRecord};
