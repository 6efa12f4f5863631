//! Structured engine events.
//!
//! Every event carries the per-request correlation id, so a failed request
//! can be reconstructed from the event stream alone.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineEvent {
    pub timestamp: String,
    pub kind: EngineEventKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEventKind {
    GenerationStarted {
        request_id: String,
        dry_run: bool,
        prompt_chars: usize,
    },
    DirectiveAssembled {
        request_id: String,
        directive_chars: usize,
        pattern_count: usize,
    },
    BackendCompleted {
        request_id: String,
        outcome: String,
        retry_count: u32,
        backend_request_id: Option<String>,
    },
    GenerationCompleted {
        request_id: String,
        node_count: usize,
        warning_count: usize,
    },
    GenerationFailed {
        request_id: String,
        reason: String,
    },
}

pub trait EngineEventObserver: Send + Sync {
    fn on_event(&self, event: &EngineEvent);
}

impl<F> EngineEventObserver for F
where
    F: Fn(&EngineEvent) + Send + Sync,
{
    fn on_event(&self, event: &EngineEvent) {
        self(event);
    }
}

pub type SharedEngineEventObserver = Arc<dyn EngineEventObserver>;
pub type EngineEventSender = mpsc::UnboundedSender<EngineEvent>;
pub type EngineEventReceiver = mpsc::UnboundedReceiver<EngineEvent>;

#[derive(Clone, Default)]
pub struct EngineEventSink {
    observer: Option<SharedEngineEventObserver>,
    sender: Option<EngineEventSender>,
}

impl EngineEventSink {
    pub fn with_observer(observer: SharedEngineEventObserver) -> Self {
        Self {
            observer: Some(observer),
            sender: None,
        }
    }

    pub fn with_sender(sender: EngineEventSender) -> Self {
        Self {
            observer: None,
            sender: Some(sender),
        }
    }

    pub fn observer(mut self, observer: SharedEngineEventObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn sender(mut self, sender: EngineEventSender) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.observer.is_some() || self.sender.is_some()
    }

    pub fn emit(&self, kind: EngineEventKind) {
        if !self.is_enabled() {
            return;
        }
        let event = EngineEvent {
            timestamp: timestamp_now(),
            kind,
        };
        if let Some(observer) = self.observer.as_ref() {
            observer.on_event(&event);
        }
        if let Some(sender) = self.sender.as_ref() {
            let _ = sender.send(event);
        }
    }
}

pub fn engine_event_channel() -> (EngineEventSender, EngineEventReceiver) {
    mpsc::unbounded_channel()
}

fn timestamp_now() -> String {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!(
        "{}.{:03}Z",
        since_epoch.as_secs(),
        since_epoch.subsec_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn event_sink_observer_and_sender_expected_both_receive_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let observer_seen = Arc::clone(&seen);
        let observer: SharedEngineEventObserver = Arc::new(move |event: &EngineEvent| {
            observer_seen
                .lock()
                .expect("observer mutex should lock")
                .push(event.kind.clone());
        });
        let (tx, mut rx) = engine_event_channel();
        let sink = EngineEventSink::with_observer(observer).sender(tx);
        sink.emit(EngineEventKind::GenerationStarted {
            request_id: "req-1".to_string(),
            dry_run: true,
            prompt_chars: 12,
        });

        let streamed = rx.try_recv().expect("channel should receive one event");
        assert!(matches!(
            streamed.kind,
            EngineEventKind::GenerationStarted { .. }
        ));
        assert_eq!(seen.lock().expect("observer mutex should lock").len(), 1);
    }
}
