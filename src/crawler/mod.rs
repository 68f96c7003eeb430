//! Crawler module for listing retrieval and extraction
//!
//! This module contains the core snapshot logic, including:
//! - Throttled HTTP fetching of listing and abstract pages
//! - HTML parsing and record extraction
//! - The pagination loop and its stop conditions
//! - Optional abstract enrichment

mod abstracts;
mod coordinator;
mod fetcher;
mod parser;
mod throttle;

pub use abstracts::{enrich_with_abstracts, EnrichmentReport};
pub use coordinator::{Coordinator, CrawlOutcome, CrawlSettings, StopReason};
pub use fetcher::{
    abstract_url, build_http_client, fetch_document, listing_url, AbstractSource, FetchFailure,
    HttpPageFetcher, PageFetcher,
};
pub use parser::{
    normalize_identifier, parse_abstract, parse_listing, parse_listing_at, HtmlListingParser,
    ListingParser,
};
pub use throttle::Throttle;

use crate::config::Config;
use crate::SnapshotError;

/// Runs a complete snapshot crawl
///
/// This is the main entry point. It will:
/// 1. Build the HTTP client
/// 2. Page through the listing until it is exhausted, the page limit is hit,
///    or a request fails
/// 3. Fetch abstracts, if enabled, for whatever was collected
///
/// A failed listing request is not an error here: it is reported in the
/// outcome's `stop_reason` together with the partial records.
///
/// # Arguments
///
/// * `config` - The snapshot configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Records and the reason the crawl stopped
/// * `Err(SnapshotError)` - The HTTP client could not be built or the
///   listing URL does not parse
pub async fn crawl(config: &Config) -> Result<CrawlOutcome, SnapshotError> {
    let client = build_http_client(&config.user_agent)?;
    let fetcher = HttpPageFetcher::new(client, &config.listing);
    let parser = HtmlListingParser::new(config.listing.page_size)
        .with_link_base(url::Url::parse(&config.listing.base_url)?);

    tracing::info!("Crawling listing {}", config.listing.base_url);

    let mut coordinator = Coordinator::new(fetcher, parser, CrawlSettings::from(&config.listing));
    let mut outcome = coordinator.run().await;

    if config.listing.fetch_abstracts && !outcome.records.is_empty() {
        let records = std::mem::take(&mut outcome.records);
        let report = enrich_with_abstracts(coordinator.fetcher_mut(), records).await;
        outcome.records = report.records;
        outcome.abstracts_missing = report.missing;
    }

    Ok(outcome)
}
