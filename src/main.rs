use anyhow::{Context, Result, anyhow};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use config::MarketplaceConfig;
use fetcher::HttpPageFetcher;
use lookup::{MarketplaceLookup, ProductLookup};
use models::BatchOutcome;
use scheduler::BatchScheduler;

mod config;
mod extractor;
mod fetcher;
mod lookup;
mod matcher;
mod models;
mod scheduler;

const DEFAULT_CONFIG_PATH: &str = "src/configs/amazon_in.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    // Single-product mode: retail-intel --single "Product Name" [config.toml]
    if args.get(1).map(String::as_str) == Some("--single") {
        let query = args
            .get(2)
            .ok_or_else(|| anyhow!("usage: retail-intel --single \"Product Name\" [config.toml]"))?;
        let config_path = args.get(3).map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH);
        return run_single(query, config_path).await;
    }

    // Batch mode: retail-intel <queries.txt> [config.toml]
    let queries_path = args
        .get(1)
        .ok_or_else(|| anyhow!("usage: retail-intel <queries.txt> [config.toml]"))?;
    let config_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH);

    run_batch(queries_path, config_path).await
}

fn build_lookup(config_path: &str) -> Result<(MarketplaceLookup<HttpPageFetcher>, MarketplaceConfig)> {
    let config = MarketplaceConfig::from_file(config_path)
        .with_context(|| format!("Failed to load marketplace config from {}", config_path))?;
    info!("Loaded config for {}: {}", config.site.name, config.site.base_url);

    let fetcher = HttpPageFetcher::new(config.clone())?;
    Ok((MarketplaceLookup::new(fetcher, config.clone()), config))
}

async fn run_single(query: &str, config_path: &str) -> Result<()> {
    let (lookup, _) = build_lookup(config_path)?;

    info!("Looking up single product: {}", query);
    match lookup.lookup(query).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            warn!("Lookup failed for '{}': {:#}", query, e);
            Err(e)
        }
    }
}

async fn run_batch(queries_path: &str, config_path: &str) -> Result<()> {
    let (lookup, config) = build_lookup(config_path)?;

    // One product name per line; blank lines ignored
    let content = std::fs::read_to_string(queries_path)
        .with_context(|| format!("Failed to read product list from {}", queries_path))?;
    let queries: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if queries.is_empty() {
        warn!("No product names found in {}", queries_path);
        return Ok(());
    }

    info!(
        "Starting batch of {} products with {} workers",
        queries.len(),
        config.scraping.max_workers
    );

    let scheduler = BatchScheduler::new(Arc::new(lookup), config.scraping.max_workers);
    let progress = scheduler.progress();

    // Live progress line while the batch runs
    let reporter = tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(500)).await;
            let state = progress.snapshot();
            info!("Processed {}/{} products...", state.completed, state.total);
            if state.total > 0 && state.completed == state.total {
                break;
            }
        }
    });

    let outcomes = scheduler.run(&queries).await;
    reporter.abort();

    let succeeded = outcomes.iter().filter(|o| !o.is_error()).count();
    for (query, outcome) in queries.iter().zip(&outcomes) {
        match outcome {
            BatchOutcome::Report(report) => {
                info!(
                    "✅ {} -> '{}' price {} ({} competitors)",
                    query,
                    report.title,
                    report.price,
                    report.competitors.len()
                );
            }
            BatchOutcome::Error { message } => {
                warn!("❌ {} -> {}", query, message);
            }
        }
    }

    info!(
        "=== Batch Summary: {} succeeded, {} failed out of {} ===",
        succeeded,
        outcomes.len() - succeeded,
        outcomes.len()
    );

    let output_path = "batch_results.json";
    std::fs::write(output_path, serde_json::to_string_pretty(&outcomes)?)
        .with_context(|| format!("Failed to write {}", output_path))?;
    info!("Wrote batch results to {}", output_path);

    Ok(())
}
