use scribe_types::DisplayBlock;
use serde::{Deserialize, Serialize};

/// Strict schema for one stored transcript item.
///
/// The audit store keeps historical messages in the same logical shape as
/// the live stream payloads; this union is the first (strict) decode stage
/// the fallback parser attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryItem {
    Thinking {
        thinking: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        signature: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    ToolUse {
        tool_id: String,
        tool_name: String,
        #[serde(default)]
        input: serde_json::Value,
        result: String,
        #[serde(default)]
        is_error: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },
}

impl HistoryItem {
    /// Convert to a render-ready block, stamping `fallback_timestamp` when
    /// the stored item carries none.
    pub fn into_block(self, fallback_timestamp: i64) -> DisplayBlock {
        match self {
            HistoryItem::Thinking { thinking, signature, timestamp } => DisplayBlock::Thinking {
                thinking,
                signature,
                timestamp: timestamp.unwrap_or(fallback_timestamp),
            },
            HistoryItem::Text { text, timestamp } => DisplayBlock::Text {
                text,
                timestamp: timestamp.unwrap_or(fallback_timestamp),
            },
            HistoryItem::ToolUse {
                tool_id,
                tool_name,
                input,
                result,
                is_error,
                timestamp,
            } => DisplayBlock::Tool {
                tool_id,
                tool_name,
                input,
                result,
                is_error,
                timestamp: timestamp.unwrap_or(fallback_timestamp),
            },
        }
    }
}

/// One row from the audit endpoint: a serialized payload plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub task_id: String,
    /// Serialized transcript content; its exact shape is not guaranteed by
    /// the backend, which is why parsing falls back through looser stages.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}
