use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::info;

use crate::config::MarketplaceConfig;
use crate::extractor::{extract_competitors, extract_listing};
use crate::fetcher::PageFetcher;
use crate::matcher::select_best_match;
use crate::models::ProductReport;

/// One product-name lookup. The batch scheduler drives implementations of
/// this; tests substitute controllable fakes.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<ProductReport>;
}

/// Composes search, candidate matching and extraction into a single lookup
/// against an abstract page fetcher.
///
/// Errors (navigation failure, timeout, no qualifying candidate) surface as
/// `Err` here and are converted to a failed slot at the scheduler boundary;
/// they never abort sibling lookups.
pub struct MarketplaceLookup<F: PageFetcher> {
    fetcher: F,
    config: MarketplaceConfig,
}

impl<F: PageFetcher> MarketplaceLookup<F> {
    pub fn new(fetcher: F, config: MarketplaceConfig) -> Self {
        MarketplaceLookup { fetcher, config }
    }

    fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.config.scraping.timeout_seconds)
    }
}

#[async_trait]
impl<F: PageFetcher> ProductLookup for MarketplaceLookup<F> {
    async fn lookup(&self, query: &str) -> Result<ProductReport> {
        let results = timeout(self.step_timeout(), self.fetcher.search(query))
            .await
            .map_err(|_| anyhow!("search timed out for '{}'", query))?
            .with_context(|| format!("search failed for '{}'", query))?;

        info!("Found {} search results for '{}'", results.len(), query);

        let candidate = select_best_match(
            query,
            &results,
            &self.config.site.base_url,
            self.config.scraping.max_candidates,
        )
        .ok_or_else(|| anyhow!("no suitable match found for '{}'", query))?;

        info!(
            "Best match for '{}': '{}' (score {})",
            query, candidate.title, candidate.score
        );

        let html = timeout(self.step_timeout(), self.fetcher.fetch_detail(&candidate.link))
            .await
            .map_err(|_| anyhow!("detail page timed out for '{}'", candidate.link))?
            .with_context(|| format!("failed to load detail page '{}'", candidate.link))?;

        // All parsing is synchronous over the owned HTML string; the parsed
        // document never crosses an await.
        let listing = extract_listing(&html, &self.config.selectors);
        let competitors = extract_competitors(
            &html,
            &self.config.selectors,
            self.config.scraping.max_competitors,
        );

        info!(
            "Extracted listing for '{}' with {} competitors",
            query,
            competitors.len()
        );

        Ok(ProductReport {
            title: listing.title,
            price: listing.price,
            reviews_text: listing.reviews_text,
            rating: listing.rating,
            product_link: candidate.link,
            competitors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PRICE_NOT_FOUND, SearchSummary};
    use std::time::Duration;

    struct FakeFetcher {
        results: Vec<SearchSummary>,
        detail_html: String,
        delay: Duration,
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn search(&self, _query: &str) -> Result<Vec<SearchSummary>> {
            tokio::time::sleep(self.delay).await;
            Ok(self.results.clone())
        }

        async fn fetch_detail(&self, _url: &str) -> Result<String> {
            tokio::time::sleep(self.delay).await;
            Ok(self.detail_html.clone())
        }
    }

    fn test_config() -> MarketplaceConfig {
        let toml_str = r#"
            [site]
            name = "Amazon India"
            base_url = "https://www.amazon.in"
            search_path = "/s"
        "#;
        toml::from_str(toml_str).unwrap()
    }

    fn detail_html() -> String {
        r#"<html><body>
            <span id="productTitle">Dyanora 24 INCH HD Ready LED TV</span>
            <span class="a-price-whole">7,999</span>
            <span id="acrCustomerReviewText">1,254 ratings</span>
            <span id="acrPopover" title="4.1 out of 5 stars"></span>
        </body></html>"#
            .to_string()
    }

    #[tokio::test]
    async fn test_lookup_assembles_full_report() {
        let fetcher = FakeFetcher {
            results: vec![SearchSummary {
                title: "Dyanora 24 INCH HD Ready LED TV".to_string(),
                link: "/dp/xyz".to_string(),
                sponsored: false,
            }],
            detail_html: detail_html(),
            delay: Duration::ZERO,
        };
        let lookup = MarketplaceLookup::new(fetcher, test_config());

        let report = lookup.lookup("Dyanora 24 INCH HD Ready LED TV").await.unwrap();
        assert_eq!(report.title, "Dyanora 24 INCH HD Ready LED TV");
        assert_eq!(report.price, "7,999");
        assert_eq!(report.rating, "4.1 out of 5 stars");
        assert_eq!(report.product_link, "https://www.amazon.in/dp/xyz");
        assert!(report.competitors.is_empty());
    }

    #[tokio::test]
    async fn test_no_eligible_results_is_an_error() {
        let fetcher = FakeFetcher {
            results: vec![SearchSummary {
                title: "Paid placement".to_string(),
                link: "/dp/ad".to_string(),
                sponsored: true,
            }],
            detail_html: detail_html(),
            delay: Duration::ZERO,
        };
        let lookup = MarketplaceLookup::new(fetcher, test_config());

        let err = lookup.lookup("Dyanora TV").await.unwrap_err();
        assert!(err.to_string().contains("no suitable match"));
    }

    #[tokio::test]
    async fn test_missing_fields_degrade_to_sentinels() {
        let fetcher = FakeFetcher {
            results: vec![SearchSummary {
                title: "Dyanora 24 INCH HD Ready LED TV".to_string(),
                link: "/dp/xyz".to_string(),
                sponsored: false,
            }],
            detail_html: r#"<html><body>
                <span id="productTitle">Dyanora 24 INCH HD Ready LED TV</span>
            </body></html>"#
                .to_string(),
            delay: Duration::ZERO,
        };
        let lookup = MarketplaceLookup::new(fetcher, test_config());

        let report = lookup.lookup("Dyanora 24 INCH HD Ready LED TV").await.unwrap();
        assert_eq!(report.price, PRICE_NOT_FOUND);
        assert_eq!(report.title, "Dyanora 24 INCH HD Ready LED TV");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_search_times_out() {
        let fetcher = FakeFetcher {
            results: Vec::new(),
            detail_html: String::new(),
            delay: Duration::from_secs(60),
        };
        let lookup = MarketplaceLookup::new(fetcher, test_config());

        let err = lookup.lookup("anything").await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
