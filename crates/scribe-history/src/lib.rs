pub mod items;
pub mod parser;
pub mod client;
pub mod error;

pub use items::{HistoryItem, HistoryRecord};
pub use parser::parse_history_payload;
pub use client::HistoryClient;
pub use error::HistoryError;
