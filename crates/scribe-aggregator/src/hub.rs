use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use scribe_types::{HubConfig, StreamEvent, TaskStatus, TranscriptPatch, TranscriptState};
use uuid::Uuid;

use crate::error::{AggregatorError, Result};
use crate::reducer::TranscriptReducer;

/// Host-side callback invoked with a partial-state patch after every event
/// that changed state.
pub type UpdateCallback = Box<dyn FnMut(TranscriptPatch) + Send>;

type SharedCallback = Arc<Mutex<UpdateCallback>>;

struct Entry {
    subscription_id: Uuid,
    reducer: TranscriptReducer,
    on_update: SharedCallback,
}

/// Multi-task subscription registry over the shared event bus.
///
/// One `TranscriptHub` serves a page: each view subscribes to its task and
/// gets back an unsubscribe handle; `handle` routes bus events to the right
/// task's reducer and filters out everything nobody is watching. The hub
/// holds the reducers behind a stable identity so hosts pass the hub into
/// the event source once instead of re-wiring closures on every re-render.
#[derive(Clone)]
pub struct TranscriptHub {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    config: HubConfig,
}

impl TranscriptHub {
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Register interest in one task's events.
    ///
    /// State is seeded from the task's last known status (from the task
    /// record the view already holds). Subscribing again to the same task
    /// replaces the previous subscription, which covers a view remounting.
    pub fn subscribe(
        &self,
        task_id: impl Into<String>,
        last_known_status: TaskStatus,
        on_update: UpdateCallback,
    ) -> Result<Subscription> {
        let task_id = task_id.into();
        if task_id.is_empty() {
            return Err(AggregatorError::EmptyTaskId);
        }

        let subscription_id = Uuid::new_v4();
        let entry = Entry {
            subscription_id,
            reducer: TranscriptReducer::new(task_id.clone(), last_known_status),
            on_update: Arc::new(Mutex::new(on_update)),
        };

        let mut entries = self.lock_entries()?;
        if entries.insert(task_id.clone(), entry).is_some() {
            tracing::debug!(task_id = %task_id, "replaced existing subscription");
        }

        Ok(Subscription {
            task_id,
            subscription_id,
            entries: Arc::downgrade(&self.entries),
        })
    }

    /// Apply one bus event.
    ///
    /// Events for tasks with no live subscription are multiplexing noise
    /// and are dropped without logging an error.
    pub fn handle(&self, event: &StreamEvent) {
        // The registry lock is released before the callback runs, so a host
        // may call snapshot (or re-subscribe) from inside on_update.
        let dispatch = {
            let mut entries = match self.lock_entries() {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!("transcript hub lock poisoned: {}", e);
                    return;
                }
            };

            let Some(entry) = entries.get_mut(event.task_id()) else {
                if self.config.trace_dropped_events {
                    tracing::debug!(task_id = %event.task_id(), "no subscriber for event");
                }
                return;
            };

            entry
                .reducer
                .apply(event)
                .map(|patch| (Arc::clone(&entry.on_update), patch))
        };

        if let Some((callback, patch)) = dispatch {
            Self::invoke(&callback, patch);
        }
    }

    /// Out-of-band failure signal, sourced from the task record rather
    /// than the event stream.
    pub fn set_task_failed(&self, task_id: &str) {
        let dispatch = {
            let Ok(mut entries) = self.lock_entries() else {
                return;
            };
            let Some(entry) = entries.get_mut(task_id) else {
                return;
            };
            entry
                .reducer
                .mark_failed()
                .map(|patch| (Arc::clone(&entry.on_update), patch))
        };

        if let Some((callback, patch)) = dispatch {
            Self::invoke(&callback, patch);
        }
    }

    fn invoke(callback: &SharedCallback, patch: TranscriptPatch) {
        match callback.lock() {
            Ok(mut on_update) => (*on_update)(patch),
            Err(e) => tracing::error!("update callback lock poisoned: {}", e),
        }
    }

    /// Current state for a subscribed task, cloned for the caller.
    pub fn snapshot(&self, task_id: &str) -> Option<TranscriptState> {
        let entries = self.lock_entries().ok()?;
        entries.get(task_id).map(|e| e.reducer.state().clone())
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock_entries().map(|e| e.len()).unwrap_or(0)
    }

    fn lock_entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|e| AggregatorError::Internal(format!("lock poisoned: {}", e)))
    }
}

impl Default for TranscriptHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Unsubscribe handle returned by `TranscriptHub::subscribe`.
///
/// Dropping it removes the task state; pending events for the task simply
/// stop being delivered. Removal is id-guarded so a stale handle from
/// before a re-subscribe cannot tear down the newer subscription.
pub struct Subscription {
    task_id: String,
    subscription_id: Uuid,
    entries: Weak<Mutex<HashMap<String, Entry>>>,
}

impl Subscription {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn unsubscribe(self) {
        // Drop does the work
    }

    fn remove(&self) {
        let Some(entries) = self.entries.upgrade() else {
            return;
        };
        let Ok(mut entries) = entries.lock() else {
            return;
        };
        if let Some(entry) = entries.get(&self.task_id) {
            if entry.subscription_id == self.subscription_id {
                entries.remove(&self.task_id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_types::DisplayBlock;

    fn collector() -> (UpdateCallback, Arc<Mutex<Vec<TranscriptPatch>>>) {
        let patches = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&patches);
        let callback: UpdateCallback = Box::new(move |patch| {
            sink.lock().unwrap().push(patch);
        });
        (callback, patches)
    }

    fn text_event(task_id: &str, text: &str) -> StreamEvent {
        StreamEvent::Text {
            task_id: task_id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_empty_task_id_rejected() {
        let hub = TranscriptHub::new();
        let (callback, _) = collector();
        assert!(matches!(
            hub.subscribe("", TaskStatus::Pending, callback),
            Err(AggregatorError::EmptyTaskId)
        ));
    }

    #[test]
    fn test_events_routed_to_subscriber() {
        let hub = TranscriptHub::new();
        let (callback, patches) = collector();
        let _sub = hub
            .subscribe("t1", TaskStatus::Pending, callback)
            .unwrap();

        hub.handle(&text_event("t1", "Hello"));
        hub.handle(&text_event("t1", " world"));

        let patches = patches.lock().unwrap();
        assert_eq!(patches.len(), 2);

        let state = hub.snapshot("t1").unwrap();
        assert_eq!(state.streaming_messages.len(), 2);
        match &state.streaming_messages[1] {
            DisplayBlock::Text { text, .. } => assert_eq!(text, " world"),
            _ => panic!("Expected text block"),
        }
    }

    #[test]
    fn test_unknown_task_is_silent_noop() {
        let hub = TranscriptHub::new();
        let (callback, patches) = collector();
        let _sub = hub
            .subscribe("t1", TaskStatus::Pending, callback)
            .unwrap();

        hub.handle(&text_event("t2", "noise"));

        assert!(patches.lock().unwrap().is_empty());
        assert!(hub.snapshot("t1").unwrap().streaming_messages.is_empty());
        assert!(hub.snapshot("t2").is_none());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let hub = TranscriptHub::new();
        let (callback, patches) = collector();
        let sub = hub
            .subscribe("t1", TaskStatus::Pending, callback)
            .unwrap();

        hub.handle(&text_event("t1", "before"));
        sub.unsubscribe();
        hub.handle(&text_event("t1", "after"));

        assert_eq!(patches.lock().unwrap().len(), 1);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_resubscribe_replaces_state() {
        let hub = TranscriptHub::new();

        let (first_cb, _) = collector();
        let stale = hub.subscribe("t1", TaskStatus::Pending, first_cb).unwrap();

        let (second_cb, patches) = collector();
        let _fresh = hub
            .subscribe("t1", TaskStatus::Processing, second_cb)
            .unwrap();

        // The stale handle must not tear down the fresh subscription
        drop(stale);
        assert_eq!(hub.subscriber_count(), 1);

        hub.handle(&text_event("t1", "x"));
        assert_eq!(patches.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_from_inside_callback() {
        let hub = TranscriptHub::new();

        // A host reads full state through snapshot whenever a partial
        // patch arrives; this must not block on the hub's own lock.
        let hub_inner = hub.clone();
        let lengths = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lengths);
        let callback: UpdateCallback = Box::new(move |patch| {
            let state = hub_inner.snapshot(&patch.task_id).unwrap();
            sink.lock().unwrap().push(state.streaming_messages.len());
        });
        let _sub = hub.subscribe("t1", TaskStatus::Pending, callback).unwrap();

        hub.handle(&text_event("t1", "a"));
        hub.handle(&text_event("t1", "b"));
        hub.set_task_failed("t1");

        assert_eq!(*lengths.lock().unwrap(), vec![1, 2, 2]);
    }

    #[test]
    fn test_out_of_band_failure() {
        let hub = TranscriptHub::new();
        let (callback, patches) = collector();
        let _sub = hub
            .subscribe("t1", TaskStatus::Processing, callback)
            .unwrap();

        hub.set_task_failed("t1");
        assert_eq!(
            hub.snapshot("t1").unwrap().task_status,
            TaskStatus::Failed
        );
        assert_eq!(
            patches.lock().unwrap()[0].task_status,
            Some(TaskStatus::Failed)
        );

        // Stream end after failure changes nothing further
        hub.handle(&StreamEvent::StreamEnd {
            task_id: "t1".to_string(),
        });
        assert_eq!(patches.lock().unwrap().len(), 1);
    }
}
