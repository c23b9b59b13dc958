use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
use wreq::Client;
use wreq_util::Emulation;

use crate::config::MarketplaceConfig;
use crate::models::SearchSummary;

use super::page_fetcher::PageFetcher;
use super::search_page::parse_search_results;

/// HTTP-backed page fetcher with browser emulation, used against the live
/// marketplace.
pub struct HttpPageFetcher {
    client: Client,
    config: MarketplaceConfig,
}

impl HttpPageFetcher {
    pub fn new(config: MarketplaceConfig) -> Result<Self> {
        let client = Client::builder()
            .emulation(Emulation::Firefox136)
            .build()?;

        Ok(HttpPageFetcher { client, config })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}{}?k={}",
            self.config.site.base_url.trim_end_matches('/'),
            self.config.site.search_path,
            urlencoding::encode(query)
        )
    }

    /// Fetch HTML page with retry logic.
    async fn fetch_page_with_retry(&self, url: &str) -> Result<String> {
        let max_retries = self.config.scraping.max_retries.max(1);
        let mut attempts = 0;

        while attempts < max_retries {
            match self.fetch_page(url).await {
                Ok(html) => return Ok(html),
                Err(e) => {
                    attempts += 1;
                    if attempts < max_retries {
                        // Exponential backoff with jitter
                        let delay = Duration::from_millis(
                            1000 * (2_u64.pow(attempts as u32)) + (rand::random::<u64>() % 1000),
                        );
                        warn!("Attempt {} failed for {}, retrying in {:?}: {}", attempts, url, delay, e);
                        sleep(delay).await;
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(anyhow!("Failed to fetch {} after {} attempts", url, max_retries))
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        // Random delay to mimic human behavior
        let delay = Duration::from_millis(500 + (rand::random::<u64>() % 1500));
        sleep(delay).await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Network error: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {}", response.status()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response text: {}", e))?;

        if html.is_empty() {
            return Err(anyhow!("Empty HTML response"));
        }

        // Basic HTML validation
        if !html.contains("<html") && !html.contains("<div") && !html.contains("<body") {
            return Err(anyhow!("Invalid HTML content"));
        }

        info!("Successfully fetched {} characters from {}", html.len(), url);
        Ok(html)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn search(&self, query: &str) -> Result<Vec<SearchSummary>> {
        let url = self.search_url(query);
        info!("Searching {}: {}", self.config.site.name, url);

        let html = self.fetch_page_with_retry(&url).await?;
        Ok(parse_search_results(
            &html,
            &self.config.selectors,
            &self.config.scraping.sponsored_label,
        ))
    }

    async fn fetch_detail(&self, url: &str) -> Result<String> {
        self.fetch_page_with_retry(url).await
    }
}
