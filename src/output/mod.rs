//! Output module for writing snapshot files
//!
//! This module handles:
//! - Rendering records as JSON and as a plain-text report
//! - Atomically replacing the output files
//! - Summarizing a run for the terminal

mod json;
mod persist;
pub mod stats;
mod text;
mod traits;

pub use json::JsonWriter;
pub use persist::write_atomic;
pub use stats::{format_statistics, print_statistics, RunStatistics};
pub use text::TextReportWriter;
pub use traits::{OutputError, OutputResult, RecordWriter};

use crate::config::OutputConfig;
use crate::state::PaperRecord;
use std::path::{Path, PathBuf};

/// Outcome of writing one output file
#[derive(Debug)]
pub struct WrittenOutput {
    /// Format name, as reported by the writer
    pub format: &'static str,

    /// Target path
    pub path: PathBuf,

    /// Whether the file was written
    pub result: OutputResult<()>,
}

/// Renders records with `writer` and writes them to `path`
///
/// # Arguments
///
/// * `writer` - The output format
/// * `records` - Records in crawl order
/// * `path` - Target file; replaced if it exists
pub fn write_output(
    writer: &dyn RecordWriter,
    records: &[PaperRecord],
    path: &Path,
) -> OutputResult<()> {
    let content = writer.render(records)?;
    write_atomic(path, &content)?;
    tracing::info!(
        "Wrote {} papers as {} to {}",
        records.len(),
        writer.format_name(),
        path.display()
    );
    Ok(())
}

/// Writes both snapshot files
///
/// Each file is written independently: a failure in one format is reported
/// in its `WrittenOutput` and does not stop or undo the other.
///
/// # Arguments
///
/// * `records` - Records in crawl order
/// * `config` - Output paths and text formatting options
/// * `category_label` - Shown in the text report header
pub fn write_snapshot(
    records: &[PaperRecord],
    config: &OutputConfig,
    category_label: &str,
) -> Vec<WrittenOutput> {
    let json = JsonWriter;
    let text = TextReportWriter::new(category_label, config.text_author_limit);

    let targets: [(&dyn RecordWriter, &str); 2] =
        [(&json, &config.json_path), (&text, &config.text_path)];

    targets
        .into_iter()
        .map(|(writer, path)| {
            let path = PathBuf::from(path);
            let result = write_output(writer, records, &path);
            if let Err(e) = &result {
                tracing::error!(
                    "Failed to write {} output to {}: {}",
                    writer.format_name(),
                    path.display(),
                    e
                );
            }
            WrittenOutput {
                format: writer.format_name(),
                path,
                result,
            }
        })
        .collect()
}
