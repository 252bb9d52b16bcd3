use scribe_types::StreamEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::hub::TranscriptHub;

/// Pump a channel of bus events into a hub until the sender side closes.
///
/// The transport (the SSE connection, a test harness) owns the sender; its
/// lifecycle is managed outside this crate. The returned handle resolves
/// once the channel closes, letting hosts await a clean shutdown.
pub fn drive(hub: TranscriptHub, mut events: mpsc::Receiver<StreamEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            hub.handle(&event);
        }
        tracing::debug!("event channel closed, transcript driver exiting");
    })
}

/// Channel sized from the hub's config, for wiring a transport to `drive`.
/// tokio requires a capacity of at least one, so smaller configs are
/// clamped rather than panicking.
pub fn event_channel(
    hub: &TranscriptHub,
) -> (mpsc::Sender<StreamEvent>, mpsc::Receiver<StreamEvent>) {
    mpsc::channel(hub.config().channel_capacity.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::UpdateCallback;
    use scribe_types::{TaskStatus, TranscriptPatch};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_zero_capacity_config_clamped() {
        let config = scribe_types::HubConfig::new().with_channel_capacity(0);
        let hub = TranscriptHub::with_config(config);

        let (tx, _rx) = event_channel(&hub);
        assert!(tx.capacity() >= 1);
    }

    #[tokio::test]
    async fn test_drive_feeds_hub_until_close() {
        let hub = TranscriptHub::new();
        let patches: Arc<Mutex<Vec<TranscriptPatch>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&patches);
        let callback: UpdateCallback = Box::new(move |patch| {
            sink.lock().unwrap().push(patch);
        });
        let _sub = hub.subscribe("t1", TaskStatus::Pending, callback).unwrap();

        let (tx, rx) = event_channel(&hub);
        let driver = drive(hub.clone(), rx);

        tx.send(StreamEvent::Text {
            task_id: "t1".to_string(),
            text: "Hello".to_string(),
        })
        .await
        .unwrap();
        tx.send(StreamEvent::StreamEnd {
            task_id: "t1".to_string(),
        })
        .await
        .unwrap();
        drop(tx);

        driver.await.unwrap();

        assert_eq!(patches.lock().unwrap().len(), 2);
        assert_eq!(
            hub.snapshot("t1").unwrap().task_status,
            TaskStatus::Completed
        );
    }
}
