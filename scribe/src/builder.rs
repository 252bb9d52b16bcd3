use scribe_aggregator::{drive, event_channel, TranscriptHub};
use scribe_types::{HubConfig, StreamEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Fluent construction of a wired transcript session: a hub, the sender a
/// transport feeds, and the running driver task.
pub struct SessionBuilder {
    config: HubConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: HubConfig::default(),
        }
    }

    pub fn config(mut self, config: HubConfig) -> Self {
        self.config = config;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// Build the hub and start the bus driver. Dropping the sender shuts
    /// the driver down.
    pub fn build(self) -> (TranscriptHub, mpsc::Sender<StreamEvent>, JoinHandle<()>) {
        let hub = TranscriptHub::with_config(self.config);
        let (tx, rx) = event_channel(&hub);
        let handle = drive(hub.clone(), rx);
        (hub, tx, handle)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
