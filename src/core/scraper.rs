use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const SCRAPE_URL: &str = "https://api.firecrawl.dev/v1/scrape";

/// Page content as returned by the scraping service.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub title: Option<String>,
    pub markdown: String,
}

#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage>;
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 1],
    #[serde(rename = "onlyMainContent")]
    only_main_content: bool,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Default, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    metadata: Option<ScrapeMetadata>,
}

#[derive(Deserialize)]
struct ScrapeMetadata {
    #[serde(default)]
    title: Option<String>,
}

pub struct FirecrawlScraper {
    api_key: String,
    client: Client,
}

impl FirecrawlScraper {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Scraper for FirecrawlScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        let req = ScrapeRequest {
            url,
            formats: ["markdown"],
            only_main_content: true,
        };
        let res = self
            .client
            .post(SCRAPE_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&req)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(anyhow!(
                "Firecrawl API Error: {}",
                res.text().await.unwrap_or_default()
            ));
        }
        let parsed: ScrapeResponse = res.json().await?;
        if !parsed.success {
            return Err(anyhow!(
                "Firecrawl scraping failed: {}",
                parsed.error.unwrap_or_else(|| "unknown error".to_string())
            ));
        }
        let data = parsed.data.unwrap_or_default();
        Ok(ScrapedPage {
            title: data.metadata.and_then(|m| m.title),
            markdown: data.markdown.unwrap_or_default(),
        })
    }
}
