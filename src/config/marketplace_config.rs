use serde::{Deserialize, Serialize};

/// Configuration for one marketplace target (site, scraping behavior,
/// CSS selectors).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    pub site: SiteConfig,
    #[serde(default)]
    pub scraping: ScrapingConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Basic site information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    /// Base origin used for the search endpoint and for rewriting
    /// relative product links.
    pub base_url: String,
    pub search_path: String,
}

/// Scraping behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingConfig {
    /// Bounded wait for each individual network step inside a lookup.
    pub timeout_seconds: u64,
    pub max_retries: usize,
    /// Concurrency cap for batch runs. Deliberately small to bound load on
    /// the target marketplace; not a performance knob.
    pub max_workers: usize,
    /// How many non-sponsored search results get scored before matching
    /// stops. Sponsored entries never count toward this.
    pub max_candidates: usize,
    /// Cap on competitor cards taken from the related-products carousel.
    pub max_competitors: usize,
    /// Label text marking a paid placement in search results.
    pub sponsored_label: String,
}

/// CSS selectors for extracting data from search and detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub search_result: String,
    pub result_title: String,
    pub result_link: String,
    pub product_title: String,
    pub product_price: String,
    pub review_count: String,
    pub rating_popover: String,
    pub competitor_panel: String,
    pub competitor_card: String,
    pub competitor_title: String,
    pub competitor_price: String,
    pub competitor_review_link: String,
}

impl MarketplaceConfig {
    /// Load configuration from TOML file.
    pub fn from_file(path: &str) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: MarketplaceConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Amazon India".to_string(),
            base_url: "https://www.amazon.in".to_string(),
            search_path: "/s".to_string(),
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            max_retries: 3,
            max_workers: 3,
            max_candidates: 2,
            max_competitors: 5,
            sponsored_label: "Sponsored".to_string(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            search_result: "div[data-component-type='s-search-result']".to_string(),
            result_title: "h2 span".to_string(),
            result_link: "a.a-link-normal[href]".to_string(),
            product_title: "#productTitle".to_string(),
            product_price: "span.a-price-whole".to_string(),
            review_count: "span#acrCustomerReviewText".to_string(),
            rating_popover: "span#acrPopover".to_string(),
            competitor_panel: "div[id*='sp_detail_thematic']".to_string(),
            competitor_card: "li.a-carousel-card".to_string(),
            competitor_title: "div[class*='sponsored-products-truncator']".to_string(),
            competitor_price: "span.a-price-whole".to_string(),
            competitor_review_link: "a.adReviewLink".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let scraping = ScrapingConfig::default();
        assert_eq!(scraping.max_workers, 3);
        assert_eq!(scraping.max_candidates, 2);
        assert_eq!(scraping.max_competitors, 5);
        assert_eq!(scraping.timeout_seconds, 10);

        let selectors = SelectorConfig::default();
        assert!(!selectors.search_result.is_empty());
        assert!(!selectors.product_title.is_empty());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
            [site]
            name = "Amazon India"
            base_url = "https://www.amazon.in"
            search_path = "/s"
        "#;
        let config: MarketplaceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.site.base_url, "https://www.amazon.in");
        // Omitted sections fall back to defaults
        assert_eq!(config.scraping.max_workers, 3);
        assert_eq!(config.selectors.product_title, "#productTitle");
    }
}
