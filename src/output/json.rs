//! Structured output: a pretty-printed JSON array of paper objects

use crate::output::traits::{OutputResult, RecordWriter};
use crate::state::PaperRecord;

/// Writes `[{"title": .., "id": .., "authors": [..]}, ..]`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl RecordWriter for JsonWriter {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn render(&self, records: &[PaperRecord]) -> OutputResult<String> {
        let mut json = serde_json::to_string_pretty(records)?;
        json.push('\n');
        Ok(json)
    }
}
