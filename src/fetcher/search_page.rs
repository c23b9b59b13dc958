use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::SelectorConfig;
use crate::extractor::{select_attr, select_text};
use crate::models::SearchSummary;

/// Parse a search results page into per-result summaries, in page order.
///
/// Cards missing a title or a navigable link are malformed and dropped.
/// Sponsored cards are kept but flagged; filtering them is the matcher's job.
pub fn parse_search_results(
    html: &str,
    selectors: &SelectorConfig,
    sponsored_label: &str,
) -> Vec<SearchSummary> {
    let document = Html::parse_document(html);

    let Ok(result_selector) = Selector::parse(&selectors.search_result) else {
        return Vec::new();
    };

    let summaries: Vec<SearchSummary> = document
        .select(&result_selector)
        .filter_map(|card| {
            let title = select_text(card, &selectors.result_title)?;
            let link = select_attr(card, &selectors.result_link, "href")?;
            Some(SearchSummary {
                title,
                link,
                sponsored: is_sponsored(card, sponsored_label),
            })
        })
        .collect();

    debug!(count = summaries.len(), "parsed search results");
    summaries
}

/// A card is sponsored when any of its spans carries the marketplace's paid
/// placement label.
fn is_sponsored(card: ElementRef<'_>, sponsored_label: &str) -> bool {
    let Ok(span_selector) = Selector::parse("span") else {
        return false;
    };
    card.select(&span_selector)
        .any(|span| span.text().any(|t| t.contains(sponsored_label)))
}
