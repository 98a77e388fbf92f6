use super::ChannelType;
use crate::sdk::{EventCallback, PusherSdk, SdkChannel};
use crate::types::{channel_events, presence_events};
use std::collections::HashMap;
use std::sync::Arc;

/// A live subscription and the SDK channel behind it
#[derive(Clone)]
pub struct Subscription {
    pub channel_type: ChannelType,
    pub handle: Arc<dyn SdkChannel>,
}

/// Channels currently subscribed, at most one per name
#[derive(Default)]
pub struct ChannelRegistry {
    subscriptions: HashMap<String, Subscription>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `channel_name` through the matching SDK entry point and
    /// binds the lifecycle events to `callback`.
    ///
    /// Subscribing to a name already present returns its type without
    /// touching the SDK.
    pub fn subscribe(
        &mut self,
        sdk: &dyn PusherSdk,
        channel_name: &str,
        callback: &EventCallback,
    ) -> ChannelType {
        if let Some(existing) = self.subscriptions.get(channel_name) {
            return existing.channel_type;
        }

        let channel_type = ChannelType::classify(channel_name);
        let handle = if channel_type.is_presence() {
            sdk.subscribe_presence(channel_name)
        } else {
            sdk.subscribe(channel_name)
        };

        // Internal bindings, never individually unbound
        for event in channel_events::ALL {
            handle.bind(event, Arc::clone(callback));
        }
        if channel_type.is_presence() {
            for event in presence_events::ALL {
                handle.bind(event, Arc::clone(callback));
            }
        }

        self.subscriptions.insert(
            channel_name.to_string(),
            Subscription {
                channel_type,
                handle,
            },
        );
        channel_type
    }

    /// Drops the subscription and asks the SDK to leave the channel.
    ///
    /// Returns the removed subscription, if there was one.
    pub fn unsubscribe(&mut self, sdk: &dyn PusherSdk, channel_name: &str) -> Option<Subscription> {
        let removed = self.subscriptions.remove(channel_name);
        sdk.unsubscribe(channel_name);
        removed
    }

    /// Generic lookup: a subscribed channel that is not a presence channel
    pub fn find(&self, channel_name: &str) -> Option<Arc<dyn SdkChannel>> {
        self.subscriptions
            .get(channel_name)
            .filter(|sub| !sub.channel_type.is_presence())
            .map(|sub| Arc::clone(&sub.handle))
    }

    /// Presence lookup
    pub fn find_presence(&self, channel_name: &str) -> Option<Arc<dyn SdkChannel>> {
        self.subscriptions
            .get(channel_name)
            .filter(|sub| sub.channel_type.is_presence())
            .map(|sub| Arc::clone(&sub.handle))
    }

    /// Lookup by the type the name implies
    pub fn lookup(&self, channel_name: &str) -> Option<Arc<dyn SdkChannel>> {
        if ChannelType::classify(channel_name).is_presence() {
            self.find_presence(channel_name)
        } else {
            self.find(channel_name)
        }
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
