//! # Scribe - transcript aggregation for AI-agent UIs
//!
//! Scribe turns a live, per-task stream of assistant events (status text,
//! thinking, text deltas, tool invocations) into a render-ready transcript,
//! and reconstructs historical transcripts from the audit store when no
//! live stream is active.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scribe::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (hub, events, _driver) = SessionBuilder::new().build();
//!
//!     let _sub = hub.subscribe("task_1", TaskStatus::Pending, Box::new(|patch| {
//!         println!("transcript changed: {:?}", patch);
//!     }))?;
//!
//!     // The transport feeds events into `events`; each accepted event
//!     // re-renders the view through the callback above.
//!     events
//!         .send(StreamEvent::Text {
//!             task_id: "task_1".to_string(),
//!             text: "Hello".to_string(),
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Scribe consists of composable crates:
//!
//! - **scribe-types**: the event and state model (StreamEvent, DisplayBlock,
//!   TranscriptState, patches, config)
//! - **scribe-aggregator**: the per-task reducer, the multi-task hub, and
//!   the bus driver
//! - **scribe-history**: tolerant reconstruction of stored transcripts

pub mod builder;

pub use scribe_types::{
    DisplayBlock, HubConfig, StreamEvent, TaskStatus, TranscriptPatch, TranscriptState,
};
pub use scribe_aggregator::{
    drive, AggregatorError, Subscription, TranscriptHub, TranscriptReducer, UpdateCallback,
};
pub use scribe_history::{parse_history_payload, HistoryClient, HistoryError, HistoryItem};

pub use builder::SessionBuilder;

pub mod prelude {
    pub use crate::builder::SessionBuilder;
    pub use scribe_aggregator::{Subscription, TranscriptHub, UpdateCallback};
    pub use scribe_history::HistoryClient;
    pub use scribe_types::{
        DisplayBlock, HubConfig, StreamEvent, TaskStatus, TranscriptPatch, TranscriptState,
    };
}
