use scribe_types::DisplayBlock;

use crate::error::{HistoryError, Result};
use crate::items::HistoryRecord;
use crate::parser::parse_history_payload;

/// Read-only client for the external audit-trail endpoint.
///
/// Used only when no live stream is active: the view fetches the stored
/// records for a task and rebuilds the transcript through the same
/// tolerant parser applied to each record's content.
pub struct HistoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HistoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetch and reconstruct the historical transcript for one task.
    pub async fn fetch_transcript(&self, task_id: &str) -> Result<Vec<DisplayBlock>> {
        let url = format!(
            "{}/tasks/{}/messages",
            self.base_url.trim_end_matches('/'),
            task_id
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(HistoryError::BadStatus {
                task_id: task_id.to_string(),
                status: response.status(),
            });
        }

        let records: Vec<HistoryRecord> = response.json().await?;
        tracing::debug!(task_id = %task_id, records = records.len(), "fetched audit records");

        let mut blocks = Vec::new();
        for record in records {
            let base = record.created_at.unwrap_or(blocks.len() as i64);
            blocks.extend(parse_history_payload(&record.content, base));
        }
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_shape() {
        // Trailing slash on the base must not double up
        let client = HistoryClient::new("https://api.example.com/");
        let url = format!(
            "{}/tasks/{}/messages",
            client.base_url.trim_end_matches('/'),
            "t1"
        );
        assert_eq!(url, "https://api.example.com/tasks/t1/messages");
    }
}
