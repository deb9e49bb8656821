use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::{PipelineStage, StageOutcome};
use crate::core::pipeline::events::{
    ContentStoredEvent, PipelineEvent, StoredSubmission, topics,
};
use crate::core::store::{StateStore, slots};

/// Persists the generated bundle so the approval boundary can read it later.
/// The write must be durably acknowledged before `content-stored` is emitted.
pub struct ReviewStage {
    store: StateStore,
}

impl ReviewStage {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PipelineStage for ReviewStage {
    fn name(&self) -> &'static str {
        "review"
    }

    fn topic(&self) -> &'static str {
        topics::CONTENT_READY
    }

    async fn handle(&self, event: PipelineEvent) -> Result<StageOutcome> {
        let PipelineEvent::ContentReady(input) = event else {
            bail!("review stage received an unexpected event type");
        };

        info!(
            "[review] content ready for review for request: {}",
            input.request_id
        );

        let submission = StoredSubmission {
            request_id: input.request_id,
            url: input.url,
            title: input.title,
            strategy: input.strategy,
            content: input.content,
            metadata: input.metadata,
        };
        let value = serde_json::to_value(&submission)?;
        self.store
            .set(&submission.request_id, slots::CONTENT, &value)
            .await
            .context("failed to persist submission")?;

        Ok(StageOutcome::Emit {
            topic: topics::CONTENT_STORED,
            event: PipelineEvent::ContentStored(ContentStoredEvent {
                request_id: submission.request_id,
                title: submission.title,
                url: submission.url,
                stored_at: Utc::now().to_rfc3339(),
            }),
        })
    }
}
