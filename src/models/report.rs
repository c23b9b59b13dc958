use serde::{Deserialize, Serialize};

/// Sentinels for the main listing fields. Absence of source data always
/// degrades to one of these strings, never to a missing field.
pub const TITLE_NOT_FOUND: &str = "Title Not Found";
pub const PRICE_NOT_FOUND: &str = "Price Not Found";
pub const NO_REVIEWS: &str = "No Reviews";
pub const RANKING_NOT_AVAILABLE: &str = "Ranking Not Available";

/// Sentinels for competitor card fields (the carousel uses different
/// placeholder wording than the main listing).
pub const COMP_TITLE_NOT_AVAILABLE: &str = "Title Not Available";
pub const COMP_PRICE_NOT_AVAILABLE: &str = "Price Not Available";
pub const COMP_RATING_NOT_AVAILABLE: &str = "Rating Not Available";

/// One entry from a marketplace search results page. Ephemeral: only lives
/// for the duration of candidate matching.
#[derive(Debug, Clone)]
pub struct SearchSummary {
    pub title: String,
    pub link: String,
    pub sponsored: bool,
}

/// The chosen best match for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub title: String,
    /// Absolute URL to the product detail page.
    pub link: String,
    /// Fuzzy similarity score in 0..=100.
    pub score: u8,
}

/// A competing product scraped from the related-products carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub title: String,
    pub price: String,
    pub rating: String,
    pub reviews: String,
}

/// The per-query result. Every field is always present; missing source data
/// shows up as a sentinel string so consumers never branch on field presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReport {
    pub title: String,
    /// Raw textual price as rendered (may contain a thousands separator).
    pub price: String,
    pub reviews_text: String,
    pub rating: String,
    pub product_link: String,
    /// At most 5 entries, in document order. Possibly empty.
    pub competitors: Vec<CompetitorEntry>,
}

/// One slot of a batch run, keyed by the original query index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Report(ProductReport),
    Error { message: String },
}

impl BatchOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, BatchOutcome::Error { .. })
    }
}
