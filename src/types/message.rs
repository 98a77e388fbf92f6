use super::error::{BridgeError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A named request issued by the host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Error envelope returned to the host for a failed request
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[error("{code}: {message}")]
pub struct ReplyError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<BridgeError> for ReplyError {
    fn from(err: BridgeError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            details: None,
        }
    }
}

/// One reply per request: `Ok(null)`, `Ok(value)` or a typed error
pub type Reply = std::result::Result<Value, ReplyError>;

/// Outbound client event payload for `trigger`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientEvent {
    pub channel_name: String,
    pub event_name: String,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelArgs {
    channel_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BindingArgs {
    channel_name: Option<String>,
    event_name: Option<String>,
}

/// Decodes a JSON payload that arrives either as an encoded string or as an
/// already-decoded object.
pub fn decode_json<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    match arguments {
        Value::String(json) => Ok(serde_json::from_str(&json)?),
        Value::Object(_) => Ok(serde_json::from_value(arguments)?),
        _ => Err(BridgeError::InvalidArguments(
            "Expected a JSON string".to_string(),
        )),
    }
}

/// Extracts a non-empty `channelName` argument
pub fn channel_name_arg(arguments: Value) -> Result<String> {
    serde_json::from_value::<ChannelArgs>(arguments)
        .ok()
        .and_then(|args| args.channel_name)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| BridgeError::InvalidArguments("Missing channel name".to_string()))
}

/// Extracts non-empty `channelName` and `eventName` arguments
pub fn binding_args(arguments: Value, operation: &str) -> Result<(String, String)> {
    let args = serde_json::from_value::<BindingArgs>(arguments).ok();
    match args {
        Some(BindingArgs {
            channel_name: Some(channel),
            event_name: Some(event),
        }) if !channel.is_empty() && !event.is_empty() => Ok((channel, event)),
        _ => Err(BridgeError::InvalidArguments(format!(
            "Missing {} arguments",
            operation
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_json_accepts_string_and_object() {
        let from_string: ClientEvent = decode_json(json!(
            r#"{"channelName":"private-a","eventName":"client-x","data":"d"}"#
        ))
        .unwrap();
        let from_object: ClientEvent =
            decode_json(json!({"channelName": "private-a", "eventName": "client-x", "data": "d"}))
                .unwrap();
        assert_eq!(from_string, from_object);
        assert_eq!(from_string.data.as_deref(), Some("d"));
    }

    #[test]
    fn test_decode_json_rejects_other_shapes() {
        let err = decode_json::<ClientEvent>(json!(42)).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENTS");

        let err = decode_json::<ClientEvent>(json!("not json")).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENTS");

        let err = decode_json::<ClientEvent>(json!({"channelName": "private-a"})).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENTS");
    }

    #[test]
    fn test_client_event_without_data() {
        let event: ClientEvent =
            decode_json(json!({"channelName": "presence-a", "eventName": "client-x"})).unwrap();
        assert_eq!(event.data, None);
    }

    #[test]
    fn test_channel_name_arg() {
        assert_eq!(
            channel_name_arg(json!({"channelName": "room"})).unwrap(),
            "room"
        );
        assert!(channel_name_arg(json!({"channelName": ""})).is_err());
        assert!(channel_name_arg(json!({})).is_err());
        assert!(channel_name_arg(Value::Null).is_err());
        assert!(channel_name_arg(json!({"channelName": 3})).is_err());
    }

    #[test]
    fn test_binding_args() {
        let (channel, event) =
            binding_args(json!({"channelName": "room", "eventName": "ev"}), "binding").unwrap();
        assert_eq!((channel.as_str(), event.as_str()), ("room", "ev"));

        let err = binding_args(json!({"channelName": "room"}), "binding").unwrap_err();
        assert_eq!(err.to_string(), "Missing binding arguments");
    }

    #[test]
    fn test_reply_error_from_bridge_error() {
        let reply: ReplyError = BridgeError::Trigger("nope".to_string()).into();
        assert_eq!(reply.code, "TRIGGER_ERROR");
        assert_eq!(reply.message, "nope");

        let json = serde_json::to_string(&reply).unwrap();
        assert!(!json.contains("details"));
    }
}
