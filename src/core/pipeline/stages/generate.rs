use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::{PipelineStage, StageOutcome};
use crate::core::llm::{ChatMessage, GenerationParams, LlmProvider};
use crate::core::pipeline::events::{
    ContentMetadata, ContentReadyEvent, GeneratedContent, LinkedinContent, PipelineEvent,
    TweetFormat, TwitterContent, topics,
};
use crate::core::prompt;

const TWITTER_PROMPT: &str = include_str!("../../prompts/generate-twitter.txt");
const LINKEDIN_PROMPT: &str = include_str!("../../prompts/generate-linkedin.txt");

const TWITTER_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.8,
    max_tokens: 800,
};
const LINKEDIN_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 1000,
};

pub struct GenerateStage {
    model: Arc<dyn LlmProvider>,
}

impl GenerateStage {
    pub fn new(model: Arc<dyn LlmProvider>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl PipelineStage for GenerateStage {
    fn name(&self) -> &'static str {
        "generate"
    }

    fn topic(&self) -> &'static str {
        topics::GENERATE_CONTENT
    }

    async fn handle(&self, event: PipelineEvent) -> Result<StageOutcome> {
        let PipelineEvent::GenerateContent(input) = event else {
            bail!("generate stage received an unexpected event type");
        };

        info!("[generate] generating social media content for: {}", input.title);

        let strategy = &input.strategy;
        let key_insights = strategy.analysis.key_insights.join(", ");
        let format_hint = match strategy.twitter_strategy.format {
            TweetFormat::Thread => "a Twitter thread (3-5 tweets)",
            TweetFormat::Single => "a single engaging tweet",
        };

        let twitter_prompt = prompt::render(
            TWITTER_PROMPT,
            &[
                ("title", &input.title),
                ("strategy", &serde_json::to_string(&strategy.twitter_strategy)?),
                ("keyInsights", &key_insights),
                ("format", format_hint),
                ("targetAudience", &strategy.analysis.target_audience),
            ],
        )?;
        let linkedin_prompt = prompt::render(
            LINKEDIN_PROMPT,
            &[
                ("title", &input.title),
                ("strategy", &serde_json::to_string(&strategy.linkedin_strategy)?),
                ("keyInsights", &key_insights),
                ("targetAudience", &strategy.analysis.target_audience),
            ],
        )?;

        // The two generations have no ordering dependency; run them
        // concurrently and require both to succeed before anything is emitted.
        let twitter_messages = [ChatMessage::user(twitter_prompt)];
        let linkedin_messages = [ChatMessage::user(linkedin_prompt)];
        let (twitter_raw, linkedin_raw) = tokio::try_join!(
            self.model.generate(&twitter_messages, TWITTER_PARAMS),
            self.model.generate(&linkedin_messages, LINKEDIN_PARAMS),
        )
        .context("content model call failed")?;

        let twitter: TwitterContent = serde_json::from_str(&twitter_raw)
            .context("content model returned malformed Twitter JSON")?;
        let linkedin: LinkedinContent = serde_json::from_str(&linkedin_raw)
            .context("content model returned malformed LinkedIn JSON")?;

        info!(
            "[generate] twitter: {} tweet(s), linkedin: {} characters",
            twitter.total_tweets, linkedin.character_count
        );

        let now = Utc::now();
        let metadata = ContentMetadata {
            generated_at: now.to_rfc3339(),
            processing_time: now.timestamp_millis() - input.timestamp,
            target_audience: strategy.analysis.target_audience.clone(),
        };

        Ok(StageOutcome::Emit {
            topic: topics::CONTENT_READY,
            event: PipelineEvent::ContentReady(ContentReadyEvent {
                request_id: input.request_id,
                url: input.url,
                title: input.title,
                strategy: input.strategy,
                content: GeneratedContent { twitter, linkedin },
                metadata,
            }),
        })
    }
}
