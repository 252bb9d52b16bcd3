use serde::{Deserialize, Serialize};

/// Tuning knobs for a transcript hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Capacity of the event channel the bus driver drains.
    pub channel_capacity: usize,
    /// Emit a tracing event for every dropped post-terminal event.
    pub trace_dropped_events: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1000,
            trace_dropped_events: true,
        }
    }
}

impl HubConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn with_trace_dropped_events(mut self, enabled: bool) -> Self {
        self.trace_dropped_events = enabled;
        self
    }
}
