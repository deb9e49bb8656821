use anyhow::{Result, anyhow};
use tokio::sync::mpsc;

use super::events::PipelineEvent;

/// One delivery on the bus: a topic name and its typed payload.
#[derive(Debug)]
pub struct Envelope {
    pub topic: &'static str,
    pub event: PipelineEvent,
}

/// Publish-side handle to the pipeline bus. Cheap to clone. Delivery is
/// fire-and-forget: the publisher never blocks on downstream stages.
#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl EventBus {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn publish(&self, topic: &'static str, event: PipelineEvent) -> Result<()> {
        self.tx
            .send(Envelope { topic, event })
            .map_err(|_| anyhow!("event bus is no longer running"))
    }
}
