pub mod events;
pub mod state;
pub mod config;

pub use events::{StreamEvent, DisplayBlock};
pub use state::{TaskStatus, TranscriptState, TranscriptPatch};
pub use config::HubConfig;
