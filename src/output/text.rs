//! Plain-text report generation
//!
//! This module renders a human-readable list of papers: a header with the
//! category, snapshot time and count, then one numbered block per paper.

use crate::output::traits::{OutputResult, RecordWriter};
use crate::state::PaperRecord;
use chrono::{DateTime, Local};

const DIVIDER_WIDTH: usize = 80;

/// Text report writer
#[derive(Debug, Clone)]
pub struct TextReportWriter {
    category_label: String,
    author_limit: usize,
    generated_at: DateTime<Local>,
}

impl TextReportWriter {
    /// Creates a writer stamped with the current local time
    ///
    /// # Arguments
    ///
    /// * `category_label` - Shown in the report header
    /// * `author_limit` - Authors listed per paper before "et al." (0 lists all)
    pub fn new(category_label: impl Into<String>, author_limit: usize) -> Self {
        Self {
            category_label: category_label.into(),
            author_limit,
            generated_at: Local::now(),
        }
    }

    /// Overrides the snapshot timestamp shown in the header
    pub fn at(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    fn format_authors(&self, authors: &[String]) -> String {
        if authors.is_empty() {
            return "(none listed)".to_string();
        }

        if self.author_limit == 0 || authors.len() <= self.author_limit {
            return authors.join(", ");
        }

        format!("{} et al.", authors[..self.author_limit].join(", "))
    }
}

impl RecordWriter for TextReportWriter {
    fn format_name(&self) -> &'static str {
        "text"
    }

    fn render(&self, records: &[PaperRecord]) -> OutputResult<String> {
        let mut text = String::new();

        // Header
        text.push_str(&format!("{} paper list\n", self.category_label));
        text.push_str(&format!(
            "Snapshot taken: {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        text.push_str(&format!("Total: {} papers\n", records.len()));
        text.push_str(&"=".repeat(DIVIDER_WIDTH));
        text.push_str("\n\n");

        for (index, record) in records.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", index + 1, record.title()));
            text.push_str(&format!("   arXiv ID: {}\n", record.id()));
            text.push_str(&format!(
                "   Authors: {}\n",
                self.format_authors(record.authors())
            ));
            if let Some(link) = record.html_link() {
                text.push_str(&format!("   HTML: {}\n", link));
            }
            if let Some(summary) = record.abstract_text() {
                text.push_str(&format!("   Abstract: {}\n", summary));
            }
            text.push('\n');
        }

        Ok(text)
    }
}
