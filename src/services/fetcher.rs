// src/services/fetcher.rs

//! Upstream listing fetcher.
//!
//! Fetches the aggregator page and slices it into raw listing blocks using
//! the configured CSS class markers.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{FetcherConfig, RawListingBlock};

/// Source of raw listing blocks. The cache manager depends on this seam, not
/// on HTTP, so refresh behavior is testable without a network.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the current set of raw listing blocks.
    ///
    /// Any upstream failure (network error, non-2xx, timeout) surfaces as an
    /// error here and is interpreted by the caller as a refresh failure.
    async fn fetch_blocks(&self) -> Result<Vec<RawListingBlock>>;
}

/// HTTP-backed listing source for the configured aggregator page.
pub struct HttpListingSource {
    client: reqwest::Client,
    url: String,
    block_selectors: Vec<Selector>,
    fallback_selector: Selector,
}

impl HttpListingSource {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let block_selectors = config
            .block_selectors
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>>>()?;
        let fallback_selector = parse_selector(&config.fallback_selector)?;

        Ok(Self {
            client,
            url: config.url.clone(),
            block_selectors,
            fallback_selector,
        })
    }

    /// Slice a fetched page into listing blocks.
    ///
    /// Tries the primary class markers first; when none of them matches
    /// anything (the upstream reshuffled its markup), falls back to the broad
    /// selector so a refresh degrades instead of coming back empty.
    fn parse_blocks(&self, html: &str) -> Vec<RawListingBlock> {
        let document = Html::parse_document(html);

        for selector in &self.block_selectors {
            let blocks: Vec<RawListingBlock> = document
                .select(selector)
                .map(|el| RawListingBlock::new(el.html()))
                .collect();
            if !blocks.is_empty() {
                return blocks;
            }
        }

        log::warn!("No block marker matched; trying broad fallback selector");
        document
            .select(&self.fallback_selector)
            .map(|el| RawListingBlock::new(el.html()))
            .collect()
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_blocks(&self) -> Result<Vec<RawListingBlock>> {
        log::info!("Fetching listings from {}", self.url);

        let html = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let blocks = self.parse_blocks(&html);
        log::info!("Upstream page yielded {} raw blocks", blocks.len());
        Ok(blocks)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
