//! # Pusher Bridge
//!
//! Exposes one managed Pusher client to a host application through a narrow
//! request/response surface and a single outbound event stream.
//!
//! The bridge owns the client lifecycle, keeps track of subscribed channels
//! and of the callback ids behind host bindings, enforces which channels a
//! client may trigger on, and funnels every SDK callback into one ordered
//! stream. The Pusher transport itself sits behind the [`sdk`] traits.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pusher_bridge::{Bridge, BridgeService, MemorySdkFactory};
//! use serde_json::{Value, json};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bridge = Bridge::new(Arc::new(MemorySdkFactory::new()));
//!     let (handle, _task) = BridgeService::spawn(bridge);
//!     let mut events = handle.listen();
//!
//!     let init = json!({"appKey": "app-key", "pusherOptions": {"cluster": "eu"}});
//!     handle.call("init", Value::String(init.to_string())).await.unwrap();
//!     handle.call("connect", Value::Null).await.unwrap();
//!     handle
//!         .call("subscribe", json!({"channelName": "private-orders"}))
//!         .await
//!         .unwrap();
//!
//!     let first = events.recv().await.unwrap();
//!     assert_eq!(first.kind(), "state");
//! }
//! ```

pub mod bridge;
pub mod channel;
pub mod client;
pub mod messaging;
pub mod sdk;
pub mod types;

pub use bridge::{Bridge, BridgeHandle, BridgeService};
pub use channel::{BindingTable, ChannelRegistry, ChannelType, authorize_trigger};
pub use client::{ClientConfig, ConnectionController, ConnectionState, InitArgs, PusherOptions};
pub use messaging::{BridgeEvent, EventSink, EventStream, PusherEvent};
pub use sdk::{MemorySdkFactory, PusherSdk, SdkChannel, SdkFactory};
pub use types::{BridgeError, ClientEvent, MethodCall, Reply, ReplyError, Result};
