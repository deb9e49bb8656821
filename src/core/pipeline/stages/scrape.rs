use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{PipelineStage, StageOutcome};
use crate::core::pipeline::events::{AnalyzeContentEvent, PipelineEvent, topics};
use crate::core::scraper::Scraper;

const FALLBACK_TITLE: &str = "Untitled Article";

pub struct ScrapeStage {
    scraper: Arc<dyn Scraper>,
}

impl ScrapeStage {
    pub fn new(scraper: Arc<dyn Scraper>) -> Self {
        Self { scraper }
    }
}

#[async_trait]
impl PipelineStage for ScrapeStage {
    fn name(&self) -> &'static str {
        "scrape"
    }

    fn topic(&self) -> &'static str {
        topics::SCRAPE_ARTICLE
    }

    async fn handle(&self, event: PipelineEvent) -> Result<StageOutcome> {
        let PipelineEvent::ScrapeArticle(input) = event else {
            bail!("scrape stage received an unexpected event type");
        };

        info!("[scrape] fetching article: {}", input.url);
        let page = self
            .scraper
            .scrape(&input.url)
            .await
            .context("article scrape failed")?;

        let title = match page.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => FALLBACK_TITLE.to_string(),
        };
        info!("[scrape] scraped '{}' ({} chars)", title, page.markdown.len());

        Ok(StageOutcome::Emit {
            topic: topics::ANALYZE_CONTENT,
            event: PipelineEvent::AnalyzeContent(AnalyzeContentEvent {
                request_id: input.request_id,
                url: input.url,
                title,
                content: page.markdown,
                timestamp: input.timestamp,
            }),
        })
    }
}
