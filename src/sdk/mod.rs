//! Capability the bridge needs from the underlying Pusher SDK.
//!
//! Transport, TLS, reconnection backoff and heartbeats all live behind these
//! traits. Calls are non-blocking: the SDK reports progress later through the
//! [`EventSink`] it was constructed with and through bound callbacks.

pub mod memory;

use crate::client::{ClientConfig, ConnectionState};
use crate::messaging::{EventSink, PusherEvent};
use std::sync::Arc;
use thiserror::Error;

pub use memory::{MemoryChannel, MemorySdk, MemorySdkFactory};

/// Listener attached to one event on one channel
pub type EventCallback = Arc<dyn Fn(PusherEvent) + Send + Sync + 'static>;

/// Error reported by the SDK itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SdkError(pub String);

/// Opaque identifier returned when a callback is bound; required to unbind it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackId(String);

impl CallbackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for CallbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live channel object owned by the SDK
pub trait SdkChannel: Send + Sync {
    fn name(&self) -> &str;

    /// Attaches `callback` to `event_name`
    fn bind(&self, event_name: &str, callback: EventCallback) -> CallbackId;

    /// Detaches one previously bound callback
    fn unbind(&self, event_name: &str, callback_id: &CallbackId);

    /// Publishes a client event on this channel
    fn trigger(&self, event_name: &str, data: &str) -> Result<(), SdkError>;
}

/// The single client connection
pub trait PusherSdk: Send + Sync {
    fn connect(&self);

    fn disconnect(&self);

    /// Session identifier, absent while not connected
    fn socket_id(&self) -> Option<String>;

    fn connection_state(&self) -> ConnectionState;

    /// Generic subscribe entry point. Subscribing to a name that is already
    /// subscribed returns the existing channel.
    fn subscribe(&self, channel_name: &str) -> Arc<dyn SdkChannel>;

    /// Presence subscribe entry point
    fn subscribe_presence(&self, channel_name: &str) -> Arc<dyn SdkChannel>;

    fn unsubscribe(&self, channel_name: &str);
}

/// Constructs the SDK client from a validated configuration.
///
/// `listener` is the SDK's only connection-state and error listener.
pub trait SdkFactory: Send + Sync {
    fn create(
        &self,
        config: &ClientConfig,
        listener: EventSink,
    ) -> Result<Arc<dyn PusherSdk>, SdkError>;
}
