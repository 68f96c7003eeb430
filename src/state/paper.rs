//! Paper and page records produced by the listing parser
//!
//! A `PaperRecord` can only be built through [`PaperRecord::new`], which
//! rejects blank titles and identifiers, so every record that leaves the
//! parser satisfies that invariant.

use serde::Serialize;

/// One paper from the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperRecord {
    title: String,
    id: String,
    authors: Vec<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_link: Option<String>,
}

impl PaperRecord {
    /// Builds a record, returning `None` if the title or identifier is blank
    pub fn new(
        title: impl Into<String>,
        id: impl Into<String>,
        authors: Vec<String>,
    ) -> Option<Self> {
        let title = title.into().trim().to_string();
        let id = id.into().trim().to_string();

        if title.is_empty() || id.is_empty() {
            return None;
        }

        Some(Self {
            title,
            id,
            authors,
            summary: None,
            html_link: None,
        })
    }

    /// Returns a copy of this record carrying the given abstract
    pub fn with_abstract(self, summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..self
        }
    }

    /// Returns a copy of this record carrying a link to the full-text HTML
    pub fn with_html_link(self, link: impl Into<String>) -> Self {
        Self {
            html_link: Some(link.into()),
            ..self
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The bare archive identifier, e.g. `2401.01234`
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn html_link(&self) -> Option<&str> {
        self.html_link.as_deref()
    }
}

/// Everything extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Accepted records in document order
    pub records: Vec<PaperRecord>,

    /// Whether another page is expected after this one
    pub has_more: bool,

    /// Entry containers located on the page, accepted or not
    pub entries_found: usize,

    /// Entries dropped for lacking a title or identifier
    pub skipped: usize,
}
