use anyhow::Result;
use async_trait::async_trait;

use crate::models::SearchSummary;

/// Abstract page-fetching capability the lookup pipeline runs against.
///
/// The core is agnostic to how navigation and rendering happen; anything that
/// can turn a query into result summaries and a URL into a rendered HTML
/// string works. Detail pages come back as owned strings because parsed
/// documents are not `Send` and must never be held across an await.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Run a marketplace search and return the result summaries in page order.
    async fn search(&self, query: &str) -> Result<Vec<SearchSummary>>;

    /// Fetch the rendered HTML of a product detail page.
    async fn fetch_detail(&self, url: &str) -> Result<String>;
}
