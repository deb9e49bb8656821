use anyhow::{Result, bail};
use async_trait::async_trait;
use tracing::info;

use super::{PipelineStage, StageOutcome};
use crate::core::pipeline::events::{PipelineEvent, topics};

/// Terminal stage: logs the final per-platform outcome and ends the chain.
pub struct CompleteStage;

#[async_trait]
impl PipelineStage for CompleteStage {
    fn name(&self) -> &'static str {
        "complete"
    }

    fn topic(&self) -> &'static str {
        topics::CONTENT_COMPLETE
    }

    async fn handle(&self, event: PipelineEvent) -> Result<StageOutcome> {
        let PipelineEvent::ContentComplete(input) = event else {
            bail!("complete stage received an unexpected event type");
        };

        info!(
            "[complete] request {} finished (twitter scheduled: {}, linkedin scheduled: {})",
            input.request_id, input.twitter.scheduled, input.linkedin.scheduled
        );
        Ok(StageOutcome::Terminal)
    }
}
