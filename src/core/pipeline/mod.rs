//! The staged content pipeline: typed events, a topic bus, and the stages
//! wired into the request lifecycle
//! submit -> scrape -> analyze -> generate -> review/store -> (approval) -> schedule.

pub mod bus;
pub mod events;
pub mod stages;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::core::llm::LlmProvider;
use crate::core::publisher::DraftPublisher;
use crate::core::scraper::Scraper;
use crate::core::store::StateStore;
use bus::{Envelope, EventBus};
use events::PipelineEvent;
use stages::{
    AnalyzeStage, CompleteStage, GenerateStage, PipelineStage, ReviewStage, ScheduleStage,
    ScrapeStage, StageOutcome,
};

/// The bus plus the subscribed stages forming the full request lifecycle.
///
/// Each delivery runs as its own task, so stages of distinct requests
/// interleave freely while a single request's chain stays strictly
/// sequential: a stage only emits its follow-up after its own delegated
/// calls have completed.
pub struct PipelineOrchestrator {
    stages: HashMap<&'static str, Arc<dyn PipelineStage>>,
    bus: EventBus,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl PipelineOrchestrator {
    pub fn new() -> Self {
        let (bus, rx) = EventBus::channel();
        Self {
            stages: HashMap::new(),
            bus,
            rx,
        }
    }

    /// Register `stage` as the single consumer of its topic.
    pub fn subscribe(&mut self, stage: Arc<dyn PipelineStage>) {
        let topic = stage.topic();
        if self.stages.insert(topic, stage).is_some() {
            warn!("topic [{}] was already subscribed; replacing the stage", topic);
        }
    }

    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    /// Run the dispatch loop for the life of the process.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        let Self {
            stages,
            bus,
            mut rx,
        } = self;
        tokio::spawn(async move {
            while let Some(Envelope { topic, event }) = rx.recv().await {
                match stages.get(topic) {
                    Some(stage) => {
                        let stage = stage.clone();
                        let bus = bus.clone();
                        tokio::spawn(deliver(stage, event, bus));
                    }
                    // Marker topics (content-stored) end the chain here.
                    None => debug!("no subscriber for topic [{}]", topic),
                }
            }
        })
    }
}

async fn deliver(stage: Arc<dyn PipelineStage>, event: PipelineEvent, bus: EventBus) {
    let request_id = event.request_id().to_string();
    match stage.handle(event).await {
        Ok(StageOutcome::Emit { topic, event }) => {
            if let Err(e) = bus.publish(topic, event) {
                error!("[{}] request {}: {:#}", stage.name(), request_id, e);
            }
        }
        Ok(StageOutcome::Terminal) => {
            debug!("[{}] request {} reached end of chain", stage.name(), request_id);
        }
        Err(e) => {
            // No retries: a failed stage aborts the rest of this request's chain.
            error!("[{}] request {} failed: {:#}", stage.name(), request_id, e);
        }
    }
}

/// Wire the production stages to their topics.
pub fn build(
    scraper: Arc<dyn Scraper>,
    model: Arc<dyn LlmProvider>,
    publisher: Arc<dyn DraftPublisher>,
    store: StateStore,
) -> PipelineOrchestrator {
    let mut orchestrator = PipelineOrchestrator::new();
    orchestrator.subscribe(Arc::new(ScrapeStage::new(scraper)));
    orchestrator.subscribe(Arc::new(AnalyzeStage::new(model.clone())));
    orchestrator.subscribe(Arc::new(GenerateStage::new(model)));
    orchestrator.subscribe(Arc::new(ReviewStage::new(store)));
    orchestrator.subscribe(Arc::new(ScheduleStage::new(publisher)));
    orchestrator.subscribe(Arc::new(CompleteStage));
    orchestrator
}
