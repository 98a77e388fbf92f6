//! In-process SDK.
//!
//! `MemorySdk` keeps channels and callbacks in memory and never touches the
//! network. Connection transitions happen immediately on `connect` and
//! `disconnect`; everything else a server would push (channel events, member
//! changes, errors, reconnects) is raised explicitly through the `simulate_*`
//! and [`MemoryChannel::deliver`] methods, from any thread.

use super::{CallbackId, EventCallback, PusherSdk, SdkChannel, SdkError, SdkFactory};
use crate::client::{ClientConfig, ConnectionState};
use crate::messaging::{EventSink, PusherEvent};
use crate::types::channel_events;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Session id shared between a client and its channels
type SocketId = Arc<Mutex<Option<String>>>;

/// A channel held by [`MemorySdk`]
pub struct MemoryChannel {
    name: String,
    presence: bool,
    socket_id: SocketId,
    subscribed: AtomicBool,
    callbacks: Mutex<HashMap<String, Vec<(CallbackId, EventCallback)>>>,
    triggered: Mutex<Vec<(String, String)>>,
    trigger_failure: Mutex<Option<String>>,
}

impl MemoryChannel {
    fn new(name: &str, presence: bool, socket_id: SocketId) -> Self {
        Self {
            name: name.to_string(),
            presence,
            socket_id,
            subscribed: AtomicBool::new(true),
            callbacks: Mutex::new(HashMap::new()),
            triggered: Mutex::new(Vec::new()),
            trigger_failure: Mutex::new(None),
        }
    }

    pub fn is_presence(&self) -> bool {
        self.presence
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    /// Ids currently bound to `event_name`, oldest first
    pub fn callback_ids(&self, event_name: &str) -> Vec<CallbackId> {
        lock(&self.callbacks)
            .get(event_name)
            .map(|bound| bound.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default()
    }

    /// Raises `event_name` on this channel as if the server sent it.
    ///
    /// Returns how many callbacks were invoked.
    pub fn deliver(&self, event_name: &str, data: Option<&str>, user_id: Option<&str>) -> usize {
        let callbacks: Vec<EventCallback> = {
            let bound = lock(&self.callbacks);
            bound
                .get(event_name)
                .map(|entries| entries.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default()
        };

        for callback in &callbacks {
            let mut event = PusherEvent::new(&self.name, event_name);
            event.data = data.map(str::to_string);
            event.user_id = user_id.map(str::to_string);
            callback(event);
        }
        callbacks.len()
    }

    /// Client events published through `trigger`, as `(event, data)`
    pub fn triggered(&self) -> Vec<(String, String)> {
        lock(&self.triggered).clone()
    }

    /// Makes subsequent triggers fail with `message`
    pub fn fail_triggers(&self, message: impl Into<String>) {
        *lock(&self.trigger_failure) = Some(message.into());
    }

    fn mark_unsubscribed(&self) {
        self.subscribed.store(false, Ordering::SeqCst);
    }
}

impl SdkChannel for MemoryChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn bind(&self, event_name: &str, callback: EventCallback) -> CallbackId {
        let id = CallbackId::new(uuid::Uuid::new_v4().to_string());
        lock(&self.callbacks)
            .entry(event_name.to_string())
            .or_default()
            .push((id.clone(), callback));
        id
    }

    fn unbind(&self, event_name: &str, callback_id: &CallbackId) {
        let mut callbacks = lock(&self.callbacks);
        if let Some(bound) = callbacks.get_mut(event_name) {
            bound.retain(|(id, _)| id != callback_id);
            if bound.is_empty() {
                callbacks.remove(event_name);
            }
        }
    }

    fn trigger(&self, event_name: &str, data: &str) -> Result<(), SdkError> {
        if !self.is_subscribed() {
            return Err(SdkError(format!(
                "Channel '{}' is no longer subscribed",
                self.name
            )));
        }
        if let Some(message) = lock(&self.trigger_failure).clone() {
            return Err(SdkError(message));
        }

        lock(&self.triggered).push((event_name.to_string(), data.to_string()));

        // Loopback: the event comes back to this channel's listeners, and
        // presence channels name the sending socket as the member
        let user_id = if self.presence {
            lock(&self.socket_id).clone()
        } else {
            None
        };
        self.deliver(event_name, Some(data), user_id.as_deref());
        Ok(())
    }
}

struct MemoryState {
    connection: ConnectionState,
    sessions: u64,
    channels: HashMap<String, Arc<MemoryChannel>>,
}

/// In-process [`PusherSdk`]
pub struct MemorySdk {
    listener: EventSink,
    socket_id: SocketId,
    state: Mutex<MemoryState>,
}

impl MemorySdk {
    pub fn new(listener: EventSink) -> Self {
        Self {
            listener,
            socket_id: Arc::new(Mutex::new(None)),
            state: Mutex::new(MemoryState {
                connection: ConnectionState::Disconnected,
                sessions: 0,
                channels: HashMap::new(),
            }),
        }
    }

    pub fn channel(&self, channel_name: &str) -> Option<Arc<MemoryChannel>> {
        lock(&self.state).channels.get(channel_name).cloned()
    }

    pub fn channel_count(&self) -> usize {
        lock(&self.state).channels.len()
    }

    /// Moves to `current` and reports the transition, as the transport would
    /// on a drop or reconnect
    pub fn simulate_state(&self, current: ConnectionState) {
        let mut state = lock(&self.state);
        let previous = state.connection;
        state.connection = current;
        if current != ConnectionState::Connected {
            *lock(&self.socket_id) = None;
        }
        self.listener.connection_state_changed(previous, current);
    }

    /// Reports an SDK-level error
    pub fn simulate_error(&self, message: &str, code: Option<&str>) {
        self.listener.error(message, code.map(str::to_string));
    }

    fn transition(&self, state: &mut MemoryState, current: ConnectionState) {
        let previous = state.connection;
        state.connection = current;
        self.listener.connection_state_changed(previous, current);
    }

    fn subscribe_with(&self, channel_name: &str, presence: bool) -> Arc<dyn SdkChannel> {
        let mut state = lock(&self.state);
        let channel = state
            .channels
            .entry(channel_name.to_string())
            .or_insert_with(|| {
                Arc::new(MemoryChannel::new(
                    channel_name,
                    presence,
                    Arc::clone(&self.socket_id),
                ))
            });
        Arc::clone(channel) as Arc<dyn SdkChannel>
    }
}

impl PusherSdk for MemorySdk {
    fn connect(&self) {
        let channels: Vec<Arc<MemoryChannel>> = {
            let mut state = lock(&self.state);
            if state.connection.is_active() {
                return;
            }

            self.transition(&mut state, ConnectionState::Connecting);
            state.sessions += 1;
            *lock(&self.socket_id) = Some(format!("{}.{}", std::process::id(), state.sessions));
            self.transition(&mut state, ConnectionState::Connected);
            state.channels.values().cloned().collect()
        };

        for channel in channels {
            channel.deliver(channel_events::SUBSCRIPTION_SUCCEEDED, None, None);
        }
    }

    fn disconnect(&self) {
        let mut state = lock(&self.state);
        if state.connection == ConnectionState::Disconnected {
            return;
        }

        self.transition(&mut state, ConnectionState::Disconnecting);
        *lock(&self.socket_id) = None;
        self.transition(&mut state, ConnectionState::Disconnected);
    }

    fn socket_id(&self) -> Option<String> {
        lock(&self.socket_id).clone()
    }

    fn connection_state(&self) -> ConnectionState {
        lock(&self.state).connection
    }

    fn subscribe(&self, channel_name: &str) -> Arc<dyn SdkChannel> {
        self.subscribe_with(channel_name, false)
    }

    fn subscribe_presence(&self, channel_name: &str) -> Arc<dyn SdkChannel> {
        self.subscribe_with(channel_name, true)
    }

    fn unsubscribe(&self, channel_name: &str) {
        if let Some(channel) = lock(&self.state).channels.remove(channel_name) {
            channel.mark_unsubscribed();
        }
    }
}

/// Builds [`MemorySdk`] clients and keeps them reachable for inspection
#[derive(Default)]
pub struct MemorySdkFactory {
    failure: Option<String>,
    created: Mutex<Vec<Arc<MemorySdk>>>,
}

impl MemorySdkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose construction always fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            created: Mutex::new(Vec::new()),
        }
    }

    /// Most recently constructed client
    pub fn last(&self) -> Option<Arc<MemorySdk>> {
        lock(&self.created).last().cloned()
    }

    pub fn created_count(&self) -> usize {
        lock(&self.created).len()
    }
}

impl SdkFactory for MemorySdkFactory {
    fn create(
        &self,
        _config: &ClientConfig,
        listener: EventSink,
    ) -> Result<Arc<dyn PusherSdk>, SdkError> {
        if let Some(message) = &self.failure {
            return Err(SdkError(message.clone()));
        }

        let sdk = Arc::new(MemorySdk::new(listener));
        lock(&self.created).push(Arc::clone(&sdk));
        Ok(sdk as Arc<dyn PusherSdk>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientConfig, InitArgs};
    use crate::messaging::BridgeEvent;

    fn config() -> ClientConfig {
        let args: InitArgs = serde_json::from_value(serde_json::json!({
            "appKey": "key",
            "pusherOptions": {"cluster": "eu"}
        }))
        .unwrap();
        ClientConfig::from_args(args).unwrap()
    }

    fn recording_callback() -> (EventCallback, Arc<Mutex<Vec<PusherEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: EventCallback = Arc::new(move |event: PusherEvent| sink.lock().unwrap().push(event));
        (callback, seen)
    }

    #[test]
    fn test_bind_deliver_unbind() {
        let channel = MemoryChannel::new("private-room", false, SocketId::default());
        let (callback, seen) = recording_callback();

        let first = channel.bind("update", Arc::clone(&callback));
        let second = channel.bind("update", callback);
        assert_ne!(first, second);
        assert_eq!(channel.callback_ids("update"), vec![first.clone(), second.clone()]);

        assert_eq!(channel.deliver("update", Some("{}"), None), 2);
        channel.unbind("update", &first);
        assert_eq!(channel.deliver("update", None, Some("u1")), 1);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].data.as_deref(), Some("{}"));
        assert_eq!(seen[2].user_id.as_deref(), Some("u1"));
        assert_eq!(channel.callback_ids("update"), vec![second]);
    }

    #[test]
    fn test_connect_and_disconnect_report_transitions() {
        let sink = EventSink::new();
        let mut stream = sink.listen();
        let sdk = MemorySdk::new(sink);

        assert_eq!(sdk.socket_id(), None);
        sdk.connect();
        assert_eq!(sdk.connection_state(), ConnectionState::Connected);
        assert!(sdk.socket_id().is_some());

        // Already connected: nothing new is reported
        sdk.connect();
        sdk.disconnect();
        assert_eq!(sdk.socket_id(), None);

        let mut transitions = Vec::new();
        while let Some(BridgeEvent::State(change)) = stream.try_recv() {
            transitions.push((change.previous_state, change.current_state));
        }
        assert_eq!(
            transitions,
            vec![
                (ConnectionState::Disconnected, ConnectionState::Connecting),
                (ConnectionState::Connecting, ConnectionState::Connected),
                (ConnectionState::Connected, ConnectionState::Disconnecting),
                (ConnectionState::Disconnecting, ConnectionState::Disconnected),
            ]
        );
    }

    #[test]
    fn test_subscribe_returns_existing_channel() {
        let sdk = MemorySdk::new(EventSink::new());
        let first = sdk.subscribe("room");
        first.bind("x", Arc::new(|_: PusherEvent| {}));
        let second = sdk.subscribe("room");

        assert_eq!(sdk.channel_count(), 1);
        assert_eq!(sdk.channel("room").unwrap().callback_ids("x").len(), 1);
        assert_eq!(second.name(), "room");
    }

    #[test]
    fn test_connect_acknowledges_existing_subscriptions() {
        let sdk = MemorySdk::new(EventSink::new());
        let channel = sdk.subscribe_presence("presence-room");
        let (callback, seen) = recording_callback();
        channel.bind(channel_events::SUBSCRIPTION_SUCCEEDED, callback);

        sdk.connect();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].channel_name, "presence-room");
        assert!(sdk.channel("presence-room").unwrap().is_presence());
    }

    #[test]
    fn test_trigger_after_unsubscribe_fails() {
        let sdk = MemorySdk::new(EventSink::new());
        let channel = sdk.subscribe("private-room");
        channel.trigger("client-a", "1").unwrap();

        sdk.unsubscribe("private-room");
        assert!(channel.trigger("client-a", "2").is_err());
        assert!(sdk.channel("private-room").is_none());
    }

    #[test]
    fn test_trigger_loops_back_to_bound_callbacks() {
        let sdk = MemorySdk::new(EventSink::new());
        let channel = sdk.subscribe_presence("presence-room");
        let (callback, seen) = recording_callback();
        channel.bind("client-x", callback);

        channel.trigger("client-x", "before").unwrap();
        sdk.connect();
        channel.trigger("client-x", "after").unwrap();
        channel.trigger("client-other", "ignored").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].data.as_deref(), Some("before"));
        assert_eq!(seen[0].user_id, None);
        assert_eq!(seen[1].data.as_deref(), Some("after"));
        assert_eq!(seen[1].user_id, sdk.socket_id());
        assert!(seen[1].user_id.is_some());
    }

    #[test]
    fn test_trigger_on_private_channel_has_no_user_id() {
        let sdk = MemorySdk::new(EventSink::new());
        sdk.connect();
        let channel = sdk.subscribe("private-room");
        let (callback, seen) = recording_callback();
        channel.bind("client-x", callback);

        channel.trigger("client-x", "d").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user_id, None);
    }

    #[test]
    fn test_simulated_drop_clears_socket_id() {
        let sdk = MemorySdk::new(EventSink::new());
        sdk.connect();
        assert!(sdk.socket_id().is_some());

        sdk.simulate_state(ConnectionState::Reconnecting);
        assert_eq!(sdk.connection_state(), ConnectionState::Reconnecting);
        assert_eq!(sdk.socket_id(), None);
    }

    #[test]
    fn test_failing_factory() {
        let factory = MemorySdkFactory::failing("no key");
        let err = factory.create(&config(), EventSink::new()).err().unwrap();
        assert_eq!(err, SdkError("no key".to_string()));
        assert_eq!(factory.created_count(), 0);
    }
}
