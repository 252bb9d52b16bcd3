use serde::{Deserialize, Serialize};

/// One event on the per-task streaming channel.
///
/// Events arrive in producer order over a shared bus; every variant carries
/// the `task_id` used to route it to the right transcript. The aggregator
/// never reorders or deduplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Progress label from the backend ("Searching...", "Running tool...").
    ///
    /// When the backend has finished the task it sends the completed
    /// content in `final_content`, which ends incremental rendering.
    Status {
        task_id: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        final_content: Option<String>,
    },

    /// Internal reasoning emitted before the visible answer.
    Thinking {
        task_id: String,
        thinking: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        signature: Option<String>,
    },

    /// Incremental response text.
    Text {
        task_id: String,
        text: String,
    },

    /// A tool invocation together with its result.
    ToolUseComplete {
        task_id: String,
        tool_id: String,
        tool_name: String,
        input: serde_json::Value,
        result: String,
        #[serde(default)]
        is_error: bool,
    },

    /// A complete, pre-rendered section of assistant text (the bulk path
    /// used alongside token deltas).
    AssistantSection {
        task_id: String,
        content: String,
    },

    /// The producer closed the task's stream.
    StreamEnd {
        task_id: String,
    },
}

impl StreamEvent {
    pub fn task_id(&self) -> &str {
        match self {
            StreamEvent::Status { task_id, .. } => task_id,
            StreamEvent::Thinking { task_id, .. } => task_id,
            StreamEvent::Text { task_id, .. } => task_id,
            StreamEvent::ToolUseComplete { task_id, .. } => task_id,
            StreamEvent::AssistantSection { task_id, .. } => task_id,
            StreamEvent::StreamEnd { task_id } => task_id,
        }
    }
}

/// A render-ready unit of transcript content.
///
/// The `timestamp` (wall-clock millis at receipt, non-decreasing within a
/// task) exists only for stable list ordering and keys, never for causal
/// ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayBlock {
    Thinking {
        thinking: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        signature: Option<String>,
        timestamp: i64,
    },

    Text {
        text: String,
        timestamp: i64,
    },

    Tool {
        tool_id: String,
        tool_name: String,
        input: serde_json::Value,
        result: String,
        is_error: bool,
        timestamp: i64,
    },
}

impl DisplayBlock {
    pub fn timestamp(&self) -> i64 {
        match self {
            DisplayBlock::Thinking { timestamp, .. } => *timestamp,
            DisplayBlock::Text { timestamp, .. } => *timestamp,
            DisplayBlock::Tool { timestamp, .. } => *timestamp,
        }
    }

    pub fn text(text: impl Into<String>, timestamp: i64) -> Self {
        DisplayBlock::Text {
            text: text.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_task_id_routing() {
        let event = StreamEvent::Text {
            task_id: "task_1".to_string(),
            text: "hello".to_string(),
        };
        assert_eq!(event.task_id(), "task_1");

        let event = StreamEvent::StreamEnd {
            task_id: "task_2".to_string(),
        };
        assert_eq!(event.task_id(), "task_2");
    }

    #[test]
    fn test_event_json_tagging() {
        let event = StreamEvent::Status {
            task_id: "t1".to_string(),
            message: "Searching...".to_string(),
            final_content: None,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "status");
        assert_eq!(json["task_id"], "t1");
        // Absent final content must not serialize at all
        assert!(json.get("final_content").is_none());
    }

    #[test]
    fn test_tool_event_from_wire_json() {
        let raw = r#"{
            "type": "tool_use_complete",
            "task_id": "t1",
            "tool_id": "call_1",
            "tool_name": "search",
            "input": {"query": "cats"},
            "result": "3 hits"
        }"#;

        let event: StreamEvent = serde_json::from_str(raw).unwrap();
        match event {
            StreamEvent::ToolUseComplete { tool_name, is_error, .. } => {
                assert_eq!(tool_name, "search");
                // is_error defaults when the producer omits it
                assert!(!is_error);
            }
            _ => panic!("Expected ToolUseComplete event"),
        }
    }
}
