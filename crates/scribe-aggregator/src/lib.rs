pub mod reducer;
pub mod hub;
pub mod driver;
pub mod error;

pub use reducer::TranscriptReducer;
pub use hub::{TranscriptHub, Subscription, UpdateCallback};
pub use driver::{drive, event_channel};
pub use error::AggregatorError;

// Re-export the model types subscribers work with
pub use scribe_types::{
    StreamEvent, DisplayBlock, TaskStatus, TranscriptState, TranscriptPatch, HubConfig,
};
