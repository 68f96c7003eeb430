//! Optional abstract enrichment
//!
//! After the listing crawl, each record can be completed with the abstract
//! from its own page. Records whose abstract was already printed in the
//! listing are not requested again. A missing or unreachable abstract never
//! drops a record.

use crate::crawler::fetcher::AbstractSource;
use crate::crawler::parser::parse_abstract;
use crate::state::PaperRecord;

/// Records after enrichment, in their original order
#[derive(Debug, Clone)]
pub struct EnrichmentReport {
    pub records: Vec<PaperRecord>,

    /// Records left without an abstract
    pub missing: usize,
}

/// Fetches and attaches the abstract of every record
///
/// Requests go through `source` one at a time, so they share its pacing.
pub async fn enrich_with_abstracts<S>(source: &mut S, records: Vec<PaperRecord>) -> EnrichmentReport
where
    S: AbstractSource + ?Sized,
{
    let total = records.len();
    let pending = records.iter().filter(|r| r.abstract_text().is_none()).count();
    let mut enriched = Vec::with_capacity(total);
    let mut missing = 0;

    tracing::info!(
        "Fetching abstracts for {} papers ({} already in listing)",
        pending,
        total - pending
    );

    for (index, record) in records.into_iter().enumerate() {
        if record.abstract_text().is_some() {
            enriched.push(record);
            continue;
        }

        tracing::debug!("Abstract {}/{}: {}", index + 1, total, record.id());

        let fetched = source.fetch_abstract_page(record.id()).await;
        let record = match fetched {
            Ok(html) => match parse_abstract(&html) {
                Some(text) => record.with_abstract(text),
                None => {
                    tracing::warn!("No abstract found on page for {}", record.id());
                    missing += 1;
                    record
                }
            },
            Err(failure) => {
                tracing::warn!("Could not fetch abstract for {}: {}", record.id(), failure);
                missing += 1;
                record
            }
        };

        enriched.push(record);
    }

    EnrichmentReport {
        records: enriched,
        missing,
    }
}
