mod analyze;
mod complete;
mod generate;
mod review;
mod schedule;
mod scrape;

pub use analyze::AnalyzeStage;
pub use complete::CompleteStage;
pub use generate::GenerateStage;
pub use review::ReviewStage;
pub use schedule::ScheduleStage;
pub use scrape::ScrapeStage;

use anyhow::Result;
use async_trait::async_trait;

use super::events::PipelineEvent;

/// What a stage did with its input event.
pub enum StageOutcome {
    /// Hand a single follow-up event to the bus.
    Emit {
        topic: &'static str,
        event: PipelineEvent,
    },
    /// End of the chain for this request.
    Terminal,
}

/// A named unit of work: consumes one event, performs its delegated calls,
/// and produces at most one follow-up event. Any failed delegated call fails
/// the stage as a whole; a failed stage emits nothing.
#[async_trait]
pub trait PipelineStage: Send + Sync {
    fn name(&self) -> &'static str;
    /// The single topic this stage consumes.
    fn topic(&self) -> &'static str;
    async fn handle(&self, event: PipelineEvent) -> Result<StageOutcome>;
}
