use crate::events::DisplayBlock;
use serde::{Deserialize, Serialize};

/// Where a task sits in its lifecycle.
///
/// Movement is strictly forward: Pending/Queued → Processing →
/// Completed | Failed. Completed and Failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Queued,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::Queued => 0,
            TaskStatus::Processing => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Failed => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Forward-only transition. Returns the new status if `to` is a real
    /// advance, None if it would move backward or sideways out of a
    /// terminal state.
    pub fn advance(self, to: TaskStatus) -> Option<TaskStatus> {
        if self.is_terminal() {
            return None;
        }
        if to.rank() > self.rank() {
            Some(to)
        } else {
            None
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// The per-task aggregate a view renders from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptState {
    pub task_id: String,
    /// Append-only while streaming; cleared once `final_response` lands.
    pub streaming_messages: Vec<DisplayBlock>,
    /// Latest progress label from a status event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_status: Option<String>,
    /// Set at most once; setting it is the terminal transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_response: Option<String>,
    pub task_status: TaskStatus,
}

impl TranscriptState {
    pub fn new(task_id: impl Into<String>, last_known_status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            streaming_messages: Vec::new(),
            working_status: None,
            final_response: None,
            task_status: last_known_status,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.final_response.is_some() || self.task_status.is_terminal()
    }

    /// Finished text for the task: the final response when present,
    /// otherwise the concatenation of streamed text blocks so far.
    pub fn final_text(&self) -> String {
        if let Some(final_response) = &self.final_response {
            return final_response.clone();
        }

        self.streaming_messages
            .iter()
            .filter_map(|block| match block {
                DisplayBlock::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Partial-state patch handed to the host view after an event changed
/// state. Absent fields mean "unchanged"; `new_blocks` only ever carries
/// what this one event appended.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptPatch {
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub new_blocks: Vec<DisplayBlock>,
    /// True when the terminal transition wiped `streaming_messages`.
    #[serde(default)]
    pub clear_streaming: bool,
}

impl TranscriptPatch {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.working_status.is_none()
            && self.final_response.is_none()
            && self.task_status.is_none()
            && self.new_blocks.is_empty()
            && !self.clear_streaming
    }
}
