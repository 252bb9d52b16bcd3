use scribe_types::{DisplayBlock, StreamEvent, TaskStatus, TranscriptPatch, TranscriptState};

/// Per-task reducer that folds stream events into a `TranscriptState`
///
/// Each call to `apply` either returns the partial-state patch produced by
/// that one event, or None when the event changed nothing (a bare status
/// ping, a duplicate after the terminal transition). The host only re-renders
/// on Some.
pub struct TranscriptReducer {
    state: TranscriptState,
    last_timestamp: i64,
}

impl TranscriptReducer {
    pub fn new(task_id: impl Into<String>, last_known_status: TaskStatus) -> Self {
        Self {
            state: TranscriptState::new(task_id, last_known_status),
            last_timestamp: 0,
        }
    }

    pub fn state(&self) -> &TranscriptState {
        &self.state
    }

    pub fn task_id(&self) -> &str {
        &self.state.task_id
    }

    /// Apply one event, returning the resulting patch if state changed.
    ///
    /// Events carrying another task's id are the caller's routing mistake
    /// and are ignored here as well.
    pub fn apply(&mut self, event: &StreamEvent) -> Option<TranscriptPatch> {
        if event.task_id() != self.state.task_id {
            return None;
        }

        // Terminal state supersedes all further incremental content.
        // Late and duplicate events are expected, not errors.
        if self.state.is_terminal() {
            tracing::debug!(
                task_id = %self.state.task_id,
                "dropping event after terminal state"
            );
            return None;
        }

        let mut patch = TranscriptPatch::new(self.state.task_id.clone());

        match event {
            StreamEvent::Status { message, final_content, .. } => {
                if !message.is_empty() && self.state.working_status.as_deref() != Some(message.as_str()) {
                    self.state.working_status = Some(message.clone());
                    patch.working_status = Some(message.clone());
                    self.advance(TaskStatus::Processing, &mut patch);
                }

                match final_content {
                    Some(content) if !content.is_empty() => {
                        self.state.final_response = Some(content.clone());
                        self.state.streaming_messages.clear();
                        patch.final_response = Some(content.clone());
                        patch.clear_streaming = true;
                        self.advance(TaskStatus::Completed, &mut patch);
                    }
                    _ => {}
                }
            }

            StreamEvent::Thinking { thinking, signature, .. } => {
                let block = DisplayBlock::Thinking {
                    thinking: thinking.clone(),
                    signature: signature.clone(),
                    timestamp: self.next_timestamp(),
                };
                self.append(block, &mut patch);
            }

            StreamEvent::Text { text, .. } => {
                let block = DisplayBlock::text(text.clone(), self.next_timestamp());
                self.append(block, &mut patch);
            }

            StreamEvent::ToolUseComplete {
                tool_id,
                tool_name,
                input,
                result,
                is_error,
                ..
            } => {
                let block = DisplayBlock::Tool {
                    tool_id: tool_id.clone(),
                    tool_name: tool_name.clone(),
                    input: input.clone(),
                    result: result.clone(),
                    is_error: *is_error,
                    timestamp: self.next_timestamp(),
                };
                self.append(block, &mut patch);
            }

            StreamEvent::AssistantSection { content, .. } => {
                let block = DisplayBlock::text(content.clone(), self.next_timestamp());
                self.append(block, &mut patch);
            }

            StreamEvent::StreamEnd { .. } => {
                self.advance(TaskStatus::Completed, &mut patch);
            }
        }

        if patch.is_empty() {
            None
        } else {
            Some(patch)
        }
    }

    /// Out-of-band failure signal from the task record, not the stream.
    pub fn mark_failed(&mut self) -> Option<TranscriptPatch> {
        let mut patch = TranscriptPatch::new(self.state.task_id.clone());
        self.advance(TaskStatus::Failed, &mut patch);

        if patch.is_empty() {
            None
        } else {
            Some(patch)
        }
    }

    fn append(&mut self, block: DisplayBlock, patch: &mut TranscriptPatch) {
        self.state.streaming_messages.push(block.clone());
        patch.new_blocks.push(block);
        self.advance(TaskStatus::Processing, patch);
    }

    fn advance(&mut self, to: TaskStatus, patch: &mut TranscriptPatch) {
        if let Some(next) = self.state.task_status.advance(to) {
            self.state.task_status = next;
            patch.task_status = Some(next);
        }
    }

    /// Wall-clock millis, bumped past the previous stamp so every block in
    /// a task gets a unique, strictly increasing ordering key even when a
    /// burst of deltas lands within one millisecond.
    fn next_timestamp(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_timestamp = now.max(self.last_timestamp + 1);
        self.last_timestamp
    }
}
