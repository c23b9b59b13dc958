use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::config::SelectorConfig;
use crate::models::{
    COMP_PRICE_NOT_AVAILABLE, COMP_RATING_NOT_AVAILABLE, COMP_TITLE_NOT_AVAILABLE, CompetitorEntry,
    NO_REVIEWS,
};

use super::{select_attr, select_first, select_text};

/// Extract up to `cap` competing products from the related/sponsored
/// products carousel of a detail page.
///
/// The panel is optional content: when absent the result is simply empty.
/// Cards are taken in document order. Rating and review count both come out
/// of the card's review-link aria-label via two independent pattern matches,
/// so one pattern failing never drags the other down with it.
pub fn extract_competitors(html: &str, selectors: &SelectorConfig, cap: usize) -> Vec<CompetitorEntry> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let Some(panel) = select_first(root, &selectors.competitor_panel) else {
        debug!("no related-products panel on page");
        return Vec::new();
    };

    let Ok(card_selector) = Selector::parse(&selectors.competitor_card) else {
        return Vec::new();
    };

    panel
        .select(&card_selector)
        .take(cap)
        .map(|card| {
            let title = select_text(card, &selectors.competitor_title)
                .unwrap_or_else(|| COMP_TITLE_NOT_AVAILABLE.to_string());
            let price = select_text(card, &selectors.competitor_price)
                .unwrap_or_else(|| COMP_PRICE_NOT_AVAILABLE.to_string());

            let label = select_attr(card, &selectors.competitor_review_link, "aria-label");
            let (rating, reviews) = parse_review_label(label.as_deref());

            CompetitorEntry { title, price, rating, reviews }
        })
        .collect()
}

/// Pull rating and review count out of a combined accessibility label like
/// `"4.3 out of 5 stars, 128 ratings"`. The two patterns are evaluated
/// independently against the same string; each falls back on its own.
fn parse_review_label(label: Option<&str>) -> (String, String) {
    let Some(label) = label else {
        return (COMP_RATING_NOT_AVAILABLE.to_string(), NO_REVIEWS.to_string());
    };

    let rating_re = Regex::new(r"(\d+\.\d+) out of (\d+) stars").unwrap();
    let reviews_re = Regex::new(r"(\d+)\s+ratings?").unwrap();

    let rating = rating_re
        .find(label)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| COMP_RATING_NOT_AVAILABLE.to_string());

    let reviews = reviews_re
        .captures(label)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NO_REVIEWS.to_string());

    (rating, reviews)
}
