//! Output writer traits and types
//!
//! This module defines the trait interface for output formats and the
//! errors they can report.

use crate::state::PaperRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for OutputError {
    fn from(error: serde_json::Error) -> Self {
        Self::Format(error.to_string())
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One output format
///
/// A writer only renders; persistence is shared (see
/// [`write_output`](crate::output::write_output)), so every format gets the
/// same all-or-nothing file replacement.
pub trait RecordWriter {
    /// Short name used in logs and the run summary
    fn format_name(&self) -> &'static str;

    /// Renders the records, in the order given, to the file contents
    fn render(&self, records: &[PaperRecord]) -> OutputResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_display() {
        let error = OutputError::Write {
            path: "/readonly/papers.json".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.to_string(), "Failed to write /readonly/papers.json: denied");
    }

    #[test]
    fn test_serde_error_becomes_format_error() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(OutputError::from(serde_error), OutputError::Format(_)));
    }
}
