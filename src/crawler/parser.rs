//! HTML parser for arXiv listing and abstract pages
//!
//! A listing page is a sequence of `<dt>`/`<dd>` pairs, one per paper,
//! possibly spread over several `<dl>` date groups:
//!
//! ```html
//! <dt><a href="/abs/2401.01234" title="Abstract">arXiv:2401.01234</a>
//!     [<a href="/html/2401.01234v1" title="View HTML">html</a>]</dt>
//! <dd>
//!   <div class="meta">
//!     <div class="list-title mathjax"><span class="descriptor">Title:</span> ...</div>
//!     <div class="list-authors"><a href="/a/doe_j_1">J. Doe</a>, ...</div>
//!     <div class="list-abstract"><span class="descriptor">Abstract:</span> ...</div>
//!   </div>
//! </dd>
//! ```
//!
//! The markup is not uniform across pages or over time, so every field has a
//! fallback and an entry that still lacks a title or identifier is skipped.
//! The abstract and HTML link are optional.

use crate::state::{PageResult, PaperRecord};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:(\d{4}\.\d{4,5})|([a-z][a-z\-]*(?:\.[A-Z]{2})?/\d{7}))(?:v\d+)?\b")
        .expect("identifier pattern is valid")
});

static ARXIV_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)arxiv:\s*(\S+)").expect("label pattern is valid"));

static AUTHOR_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;]|\band\b").expect("separator pattern is valid"));

static TITLE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^title:\s*").expect("label pattern is valid"));

static AUTHORS_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^authors?:\s*").expect("label pattern is valid"));

static ABSTRACT_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^abstract:\s*").expect("label pattern is valid"));

/// Relative links on listing pages point into arXiv itself
static ARXIV_ORIGIN: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://arxiv.org/").expect("origin URL is valid"));

/// Turns one raw listing document into records
pub trait ListingParser {
    /// Parses a listing page; must not depend on anything but `document`
    fn parse(&self, document: &str) -> PageResult;
}

/// [`ListingParser`] for arXiv's HTML listing pages
#[derive(Debug, Clone)]
pub struct HtmlListingParser {
    page_size: u32,
    link_base: Url,
}

impl HtmlListingParser {
    /// `page_size` is the number of entries a full page carries
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            link_base: ARXIV_ORIGIN.clone(),
        }
    }

    /// Resolves relative links against `link_base` instead of arxiv.org
    pub fn with_link_base(mut self, link_base: Url) -> Self {
        self.link_base = link_base;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl ListingParser for HtmlListingParser {
    fn parse(&self, document: &str) -> PageResult {
        parse_listing_at(document, self.page_size, &self.link_base)
    }
}

/// Parses a listing page and decides whether another page follows
///
/// Relative links are resolved against `https://arxiv.org/`.
///
/// # "Has more" heuristic
///
/// The listing does not say whether a next page exists. A page is taken to
/// be followed by another one when it holds at least `page_size` entries; a
/// short page is the last one. A page with no accepted records always ends
/// the listing, which covers categories whose size is an exact multiple of
/// the page size. A page that is full only because of stray markup can make
/// this guess wrong, so the crawl loop also caps the page count.
///
/// # Example
///
/// ```
/// use arxiv_snapshot::crawler::parse_listing;
///
/// let html = r#"<dl>
///   <dt><a href="/abs/2401.01234v2">arXiv:2401.01234</a></dt>
///   <dd><div class="list-title"><span class="descriptor">Title:</span> A Robot</div>
///       <div class="list-authors"><a href="/a/doe_j_1">J. Doe</a></div></dd>
/// </dl>"#;
///
/// let page = parse_listing(html, 50);
/// assert_eq!(page.records[0].id(), "2401.01234");
/// assert_eq!(page.records[0].title(), "A Robot");
/// assert!(!page.has_more);
/// ```
pub fn parse_listing(html: &str, page_size: u32) -> PageResult {
    parse_listing_at(html, page_size, &ARXIV_ORIGIN)
}

/// Like [`parse_listing`], resolving relative links against `link_base`
pub fn parse_listing_at(html: &str, page_size: u32, link_base: &Url) -> PageResult {
    let document = Html::parse_document(html);

    let Some(entry_selector) = selector("dt") else {
        return PageResult::default();
    };

    let mut records = Vec::new();
    let mut entries_found = 0;
    let mut skipped = 0;

    for dt in document.select(&entry_selector) {
        entries_found += 1;

        match extract_record(dt, paired_details(dt), link_base) {
            Some(record) => records.push(record),
            None => {
                skipped += 1;
                tracing::debug!(
                    "Skipping listing entry {} without title or identifier",
                    entries_found
                );
            }
        }
    }

    let has_more = !records.is_empty() && entries_found >= page_size as usize;

    PageResult {
        records,
        has_more,
        entries_found,
        skipped,
    }
}

/// Extracts the abstract from a paper's abstract page
///
/// Looks for `<blockquote class="abstract">`, falling back to any
/// `<blockquote>` mentioning "Abstract". The leading `Abstract:` label is
/// removed and whitespace collapsed.
pub fn parse_abstract(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let abstract_selector = selector("blockquote.abstract")?;
    let blockquote_selector = selector("blockquote")?;

    let block = document.select(&abstract_selector).next().or_else(|| {
        document
            .select(&blockquote_selector)
            .find(|b| element_text(*b).contains("Abstract"))
    })?;

    let text = strip_label(&element_text(block), &ABSTRACT_LABEL_RE);
    (!text.is_empty()).then_some(text)
}

/// Finds the `<dd>` belonging to a `<dt>`: the next `<dd>` sibling before
/// any further `<dt>`
fn paired_details<'a>(dt: ElementRef<'a>) -> Option<ElementRef<'a>> {
    dt.next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|el| el.value().name() != "dt")
        .find(|el| el.value().name() == "dd")
}

fn extract_record(
    dt: ElementRef<'_>,
    dd: Option<ElementRef<'_>>,
    link_base: &Url,
) -> Option<PaperRecord> {
    let id = extract_identifier(dt, dd)?;
    let dd = dd?;
    let title = extract_title(dd)?;
    let authors = extract_authors(dd);
    let mut record = PaperRecord::new(title, id, authors)?;

    if let Some(summary) = extract_listing_abstract(dd) {
        record = record.with_abstract(summary);
    }
    if let Some(link) = extract_html_link(dt, link_base) {
        record = record.with_html_link(link);
    }

    Some(record)
}

/// Identifier candidates, in order: the `<dt>` abstract link, an `arXiv:`
/// label in the `<dt>` text, an abstract link inside the `<dd>`
fn extract_identifier(dt: ElementRef<'_>, dd: Option<ElementRef<'_>>) -> Option<String> {
    let abs_links = selector(r#"a[href*="/abs/"]"#)?;

    let from_links = |el: ElementRef<'_>| {
        el.select(&abs_links)
            .filter_map(|a| a.value().attr("href"))
            .find_map(normalize_identifier)
    };

    from_links(dt)
        .or_else(|| identifier_from_label(&element_text(dt)))
        .or_else(|| dd.and_then(from_links))
}

/// Reduces an href or label to the bare identifier
///
/// Accepts new-style (`2401.01234`) and old-style (`hep-th/9901001`)
/// identifiers and drops any version suffix.
///
/// # Example
///
/// ```
/// use arxiv_snapshot::crawler::normalize_identifier;
///
/// assert_eq!(
///     normalize_identifier("https://arxiv.org/abs/2401.01234v3").as_deref(),
///     Some("2401.01234")
/// );
/// assert_eq!(
///     normalize_identifier("/abs/math.GT/0309136").as_deref(),
///     Some("math.GT/0309136")
/// );
/// assert_eq!(normalize_identifier("/abs/"), None);
/// ```
pub fn normalize_identifier(raw: &str) -> Option<String> {
    let caps = IDENTIFIER_RE.captures(raw)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn identifier_from_label(text: &str) -> Option<String> {
    ARXIV_LABEL_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| normalize_identifier(m.as_str()))
}

/// Title from `div.list-title`, else from the parent of a `Title:` descriptor
fn extract_title(dd: ElementRef<'_>) -> Option<String> {
    let title_selector = selector("div.list-title")?;

    let raw = match dd.select(&title_selector).next() {
        Some(div) => element_text(div),
        None => {
            let descriptor_selector = selector("span.descriptor")?;
            dd.select(&descriptor_selector)
                .find(|span| element_text(*span).trim().eq_ignore_ascii_case("title:"))
                .and_then(|span| span.parent())
                .and_then(ElementRef::wrap)
                .map(element_text)?
        }
    };

    let title = strip_label(&raw, &TITLE_LABEL_RE);
    (!title.is_empty()).then_some(title)
}

/// Authors in listing order; empty when the field is missing or blank
fn extract_authors(dd: ElementRef<'_>) -> Vec<String> {
    let (Some(field_selector), Some(link_selector)) =
        (selector("div.list-authors"), selector("a"))
    else {
        return Vec::new();
    };

    let Some(field) = dd.select(&field_selector).next() else {
        return Vec::new();
    };

    let linked: Vec<String> = field
        .select(&link_selector)
        .filter(|a| a.value().attr("href").is_some_and(is_author_href))
        .map(|a| collapse_whitespace(&element_text(a)))
        .filter(|name| !name.is_empty())
        .collect();

    if !linked.is_empty() {
        return linked;
    }

    split_author_field(&strip_label(&element_text(field), &AUTHORS_LABEL_RE))
}

/// Abstract printed in the listing itself, when the page carries one
fn extract_listing_abstract(dd: ElementRef<'_>) -> Option<String> {
    let abstract_selector = selector("div.list-abstract")?;
    let div = dd.select(&abstract_selector).next()?;
    let text = strip_label(&element_text(div), &ABSTRACT_LABEL_RE);
    (!text.is_empty()).then_some(text)
}

/// Full-text HTML link from the `<dt>`, made absolute
fn extract_html_link(dt: ElementRef<'_>, link_base: &Url) -> Option<String> {
    let html_links = selector(r#"a[href*="/html/"]"#)?;
    let link = dt
        .select(&html_links)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .find_map(|href| link_base.join(href).ok())?;
    Some(link.into())
}

/// Skips in-page anchors and script links, which are never author pages
fn is_author_href(href: &str) -> bool {
    let href = href.trim();
    !(href.is_empty() || href.starts_with('#') || href.starts_with("javascript:"))
}

/// Splits a plain-text author field on commas, semicolons and "and"
fn split_author_field(text: &str) -> Vec<String> {
    AUTHOR_SEPARATOR_RE
        .split(text)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collapses whitespace and removes a leading label matched by `label`
fn strip_label(text: &str, label: &Regex) -> String {
    label.replace(&collapse_whitespace(text), "").into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}
