use scraper::Html;
use tracing::debug;

use crate::config::SelectorConfig;
use crate::models::{NO_REVIEWS, PRICE_NOT_FOUND, RANKING_NOT_AVAILABLE, TITLE_NOT_FOUND};

use super::{select_attr, select_text};

/// The four top-level listing fields, already sentinel-mapped.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFields {
    pub title: String,
    pub price: String,
    pub reviews_text: String,
    pub rating: String,
}

/// Extract title, price, review count and rating from a product detail page.
///
/// Each field is looked up independently; one missing element never affects
/// the others. A failed lookup maps to that field's sentinel. The rating
/// lives in the popover's `title` attribute, the rest are element text.
pub fn extract_listing(html: &str, selectors: &SelectorConfig) -> ListingFields {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title = select_text(root, &selectors.product_title);
    let price = select_text(root, &selectors.product_price);
    let reviews_text = select_text(root, &selectors.review_count);
    let rating = select_attr(root, &selectors.rating_popover, "title");

    debug!(
        title_found = title.is_some(),
        price_found = price.is_some(),
        reviews_found = reviews_text.is_some(),
        rating_found = rating.is_some(),
        "extracted listing fields"
    );

    ListingFields {
        title: title.unwrap_or_else(|| TITLE_NOT_FOUND.to_string()),
        price: price.unwrap_or_else(|| PRICE_NOT_FOUND.to_string()),
        reviews_text: reviews_text.unwrap_or_else(|| NO_REVIEWS.to_string()),
        rating: rating.unwrap_or_else(|| RANKING_NOT_AVAILABLE.to_string()),
    }
}
