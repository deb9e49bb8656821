use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{PipelineStage, StageOutcome};
use crate::core::llm::{ChatMessage, GenerationParams, LlmProvider};
use crate::core::pipeline::events::{
    ContentStrategy, GenerateContentEvent, PipelineEvent, topics,
};
use crate::core::prompt;

const STRATEGY_PROMPT: &str = include_str!("../../prompts/analyze-content.txt");
const STRATEGY_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 1500,
};

pub struct AnalyzeStage {
    model: Arc<dyn LlmProvider>,
}

impl AnalyzeStage {
    pub fn new(model: Arc<dyn LlmProvider>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl PipelineStage for AnalyzeStage {
    fn name(&self) -> &'static str {
        "analyze"
    }

    fn topic(&self) -> &'static str {
        topics::ANALYZE_CONTENT
    }

    async fn handle(&self, event: PipelineEvent) -> Result<StageOutcome> {
        let PipelineEvent::AnalyzeContent(input) = event else {
            bail!("analyze stage received an unexpected event type");
        };

        info!("[analyze] analyzing content: {}", input.title);

        let prompt = prompt::render(
            STRATEGY_PROMPT,
            &[("title", &input.title), ("content", &input.content)],
        )?;
        let raw = self
            .model
            .generate(&[ChatMessage::user(prompt)], STRATEGY_PARAMS)
            .await
            .context("strategy model call failed")?;
        let strategy: ContentStrategy =
            serde_json::from_str(&raw).context("strategy model returned malformed JSON")?;

        info!(
            "[analyze] strategy created, target audience: {}",
            strategy.analysis.target_audience
        );

        Ok(StageOutcome::Emit {
            topic: topics::GENERATE_CONTENT,
            event: PipelineEvent::GenerateContent(GenerateContentEvent {
                request_id: input.request_id,
                url: input.url,
                title: input.title,
                content: input.content,
                strategy,
                timestamp: input.timestamp,
            }),
        })
    }
}
