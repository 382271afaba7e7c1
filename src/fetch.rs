//! Page retrieval and site URL construction

use crate::config::ScraperConfig;
use crate::constants::{INDEX_PATH, MUSHER_PATH, STATUS_PATH};
use crate::error::{Result, ScrapeError};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Source of page markup.
///
/// The scraper only needs the body text of a URL; tests substitute an
/// in-memory implementation.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP with a blocking client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ScrapeError::configuration(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| ScrapeError::fetch(url, e.to_string()))?;

        // Decodes using the charset from Content-Type
        response
            .text()
            .map_err(|e| ScrapeError::fetch(url, format!("unreadable body: {}", e)))
    }
}

/// URLs of the three page kinds the scraper reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    root: String,
}

impl SiteUrls {
    pub fn new(root: &str) -> Self {
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn index(&self) -> String {
        format!("{}{}", self.root, INDEX_PATH)
    }

    pub fn race_status(&self, race_id: u32) -> String {
        format!("{}{}&rid={}", self.root, STATUS_PATH, race_id)
    }

    pub fn musher_results(&self, race_id: u32, musher_id: u32) -> String {
        format!(
            "{}{}&rid={}&entr.id={}",
            self.root, MUSHER_PATH, race_id, musher_id
        )
    }
}
