//! Run statistics
//!
//! This module condenses a crawl outcome and the write results into a short
//! summary printed at the end of a run.

use crate::crawler::CrawlOutcome;
use crate::output::WrittenOutput;

/// Run statistics summary
#[derive(Debug, Clone)]
pub struct RunStatistics {
    /// Listing pages fetched successfully
    pub pages_fetched: u32,

    /// Records collected
    pub papers: usize,

    /// Entries dropped for lacking a title or identifier
    pub entries_skipped: usize,

    /// Records without an abstract after enrichment
    pub abstracts_missing: usize,

    /// Human-readable reason the crawl stopped
    pub stop_reason: String,

    /// `(format, path, error)` for each output file
    pub outputs: Vec<(String, String, Option<String>)>,
}

impl RunStatistics {
    /// Collects statistics from a finished run
    pub fn collect(outcome: &CrawlOutcome, written: &[WrittenOutput]) -> Self {
        Self {
            pages_fetched: outcome.pages_fetched,
            papers: outcome.records.len(),
            entries_skipped: outcome.entries_skipped,
            abstracts_missing: outcome.abstracts_missing,
            stop_reason: outcome.stop_reason.to_string(),
            outputs: written
                .iter()
                .map(|w| {
                    (
                        w.format.to_string(),
                        w.path.display().to_string(),
                        w.result.as_ref().err().map(|e| e.to_string()),
                    )
                })
                .collect(),
        }
    }

    /// Returns true if any output file failed to write
    pub fn has_failures(&self) -> bool {
        self.outputs.iter().any(|(_, _, error)| error.is_some())
    }
}

/// Formats statistics for the terminal
pub fn format_statistics(stats: &RunStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== Snapshot Summary ===\n\n");
    out.push_str(&format!("Pages fetched:    {}\n", stats.pages_fetched));
    out.push_str(&format!("Papers collected: {}\n", stats.papers));
    out.push_str(&format!("Entries skipped:  {}\n", stats.entries_skipped));
    if stats.abstracts_missing > 0 {
        out.push_str(&format!("Missing abstracts: {}\n", stats.abstracts_missing));
    }
    out.push_str(&format!("Stopped because:  {}\n", stats.stop_reason));

    if !stats.outputs.is_empty() {
        out.push_str("\nOutput files:\n");
        for (format, path, error) in &stats.outputs {
            match error {
                None => out.push_str(&format!("  ✓ {} → {}\n", format, path)),
                Some(error) => out.push_str(&format!("  ✗ {} → {}: {}\n", format, path, error)),
            }
        }
    }

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &RunStatistics) {
    print!("{}", format_statistics(stats));
}
