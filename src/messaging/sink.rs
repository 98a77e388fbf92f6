use super::event::{BridgeEvent, ConnectionStateChange, ErrorEvent, PusherEvent};
use crate::client::ConnectionState;
use crate::sdk::EventCallback;
use futures::Stream;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

type Listener = mpsc::UnboundedSender<BridgeEvent>;

/// Single outbound stream for every asynchronous notification.
///
/// Cloned handles share one listener slot. SDK callbacks may call `emit` from
/// any thread; the slot lock makes each emission a single enqueue, so events
/// reach the listener in the order they were raised. Events raised while no
/// listener is attached are dropped.
#[derive(Clone, Default)]
pub struct EventSink {
    listener: Arc<Mutex<Option<Listener>>>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Listener>> {
        self.listener.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attaches a new listener, ending the stream of any previous one
    pub fn listen(&self) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.slot() = Some(tx);
        EventStream { rx }
    }

    /// Stops delivery; the current stream ends once drained
    pub fn detach(&self) {
        self.slot().take();
    }

    pub fn has_listener(&self) -> bool {
        self.slot().as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Enqueues one event for the current listener.
    ///
    /// Returns `false` when the event was dropped.
    pub fn emit(&self, event: BridgeEvent) -> bool {
        let mut slot = self.slot();
        let Some(tx) = slot.as_ref() else {
            return false;
        };

        if tx.send(event).is_err() {
            // Listener stream was dropped
            *slot = None;
            return false;
        }
        true
    }

    pub fn connection_state_changed(&self, previous: ConnectionState, current: ConnectionState) {
        self.emit(BridgeEvent::State(ConnectionStateChange {
            previous_state: previous,
            current_state: current,
        }));
    }

    pub fn channel_event(&self, event: PusherEvent) {
        self.emit(BridgeEvent::Event(event));
    }

    pub fn error(&self, message: impl Into<String>, code: Option<String>) {
        self.emit(BridgeEvent::Error(ErrorEvent::connection(message, code)));
    }

    /// Callback handed to the SDK when binding channel events
    pub fn event_callback(&self) -> EventCallback {
        let sink = self.clone();
        Arc::new(move |event: PusherEvent| sink.channel_event(event))
    }
}

/// Receiving side of the outbound stream
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<BridgeEvent>,
}

impl EventStream {
    /// Next event, or `None` once this listener was replaced or detached and
    /// every queued event was consumed
    pub async fn recv(&mut self) -> Option<BridgeEvent> {
        self.rx.recv().await
    }

    /// Next queued event without waiting
    pub fn try_recv(&mut self) -> Option<BridgeEvent> {
        self.rx.try_recv().ok()
    }
}

impl Stream for EventStream {
    type Item = BridgeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
