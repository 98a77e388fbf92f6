use crate::client::ConnectionState;
use serde::{Deserialize, Serialize};

/// Connection state transition, as raised by the SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStateChange {
    pub previous_state: ConnectionState,
    pub current_state: ConnectionState,
}

/// Channel data or membership event delivered to a bound callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PusherEvent {
    pub channel_name: String,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl PusherEvent {
    pub fn new(channel_name: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
            event_name: event_name.into(),
            data: None,
            user_id: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Error raised asynchronously by the SDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEvent {
    /// Where the error came from (`connection` or a channel name)
    pub origin: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorEvent {
    pub const CONNECTION_ORIGIN: &'static str = "connection";

    pub fn connection(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            origin: Self::CONNECTION_ORIGIN.to_string(),
            message: message.into(),
            code,
        }
    }
}

/// Tagged event on the outbound stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum BridgeEvent {
    State(ConnectionStateChange),
    Event(PusherEvent),
    Error(ErrorEvent),
}

impl BridgeEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::State(_) => "state",
            Self::Event(_) => "event",
            Self::Error(_) => "error",
        }
    }
}
