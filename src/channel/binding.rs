use super::ChannelRegistry;
use crate::sdk::{CallbackId, EventCallback};
use crate::types::{BridgeError, Result};
use std::collections::HashMap;

/// Two-part key; channel and event names never alias across the split
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub channel_name: String,
    pub event_name: String,
}

impl BindingKey {
    pub fn new(channel_name: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
            event_name: event_name.into(),
        }
    }
}

/// Result of a successful `unbind`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unbound {
    pub callback_id: CallbackId,
    /// Whether the SDK channel was still live to detach from
    pub detached: bool,
}

/// Callback ids for host-requested bindings, keyed by (channel, event)
#[derive(Debug, Default)]
pub struct BindingTable {
    entries: HashMap<BindingKey, CallbackId>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `callback` to `event_name` on the subscribed channel and
    /// records the returned id.
    ///
    /// Rebinding a key keeps only the newest id. The previous id stays
    /// attached in the SDK and is returned so callers can see the leak.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] if the channel is not subscribed.
    pub fn bind(
        &mut self,
        registry: &ChannelRegistry,
        channel_name: &str,
        event_name: &str,
        callback: EventCallback,
    ) -> Result<Option<CallbackId>> {
        let channel = registry.lookup(channel_name).ok_or_else(|| {
            BridgeError::NotFound(format!("Channel '{}' is not subscribed", channel_name))
        })?;

        let callback_id = channel.bind(event_name, callback);
        Ok(self
            .entries
            .insert(BindingKey::new(channel_name, event_name), callback_id))
    }

    /// Removes the binding and detaches it from the channel if the channel is
    /// still subscribed. The entry is removed either way.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidArguments`] if nothing is bound under
    /// the key.
    pub fn unbind(
        &mut self,
        registry: &ChannelRegistry,
        channel_name: &str,
        event_name: &str,
    ) -> Result<Unbound> {
        let callback_id = self
            .entries
            .remove(&BindingKey::new(channel_name, event_name))
            .ok_or_else(|| {
                BridgeError::InvalidArguments(format!(
                    "No binding for event '{}' on channel '{}'",
                    event_name, channel_name
                ))
            })?;

        let detached = match registry.lookup(channel_name) {
            Some(channel) => {
                channel.unbind(event_name, &callback_id);
                true
            }
            None => false,
        };

        Ok(Unbound {
            callback_id,
            detached,
        })
    }

    pub fn get(&self, channel_name: &str, event_name: &str) -> Option<&CallbackId> {
        self.entries
            .get(&BindingKey::new(channel_name, event_name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
