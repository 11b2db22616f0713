//! Web scraping client. A URL goes in, the page's markdown rendering comes
//! out; the heavy lifting happens in the Firecrawl service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape_markdown(&self, url: &str) -> Result<String, ApiError>;
}

#[derive(Clone)]
pub struct FirecrawlScraper {
    base_url: String,
    api_key: String,
    client: Client,
}

impl FirecrawlScraper {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        }
    }
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'a str; 2],
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
}

#[async_trait]
impl Scraper for FirecrawlScraper {
    async fn scrape_markdown(&self, url: &str) -> Result<String, ApiError> {
        let endpoint = format!("{}/v1/scrape", self.base_url);
        let body = ScrapeRequest {
            url,
            formats: ["markdown", "links"],
        };

        let res = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            tracing::error!("Error while scraping the content from the URL: {} {}", status, text);
            return Err(ApiError::Internal(format!(
                "scrape request failed ({status}): {text}"
            )));
        }

        let payload: ScrapeResponse = res.json().await.map_err(ApiError::internal)?;
        if !payload.success {
            let reason = payload.error.unwrap_or_else(|| "unknown scrape error".to_string());
            tracing::error!("Error while scraping the content from the URL: {}", reason);
            return Err(ApiError::Internal(reason));
        }

        payload
            .data
            .and_then(|data| data.markdown)
            .ok_or_else(|| ApiError::Internal("scrape response has no markdown".to_string()))
    }
}
