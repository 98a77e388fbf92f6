// Messaging module - outbound notifications to the host
pub mod event;
pub mod sink;

pub use event::{BridgeEvent, ConnectionStateChange, ErrorEvent, PusherEvent};
pub use sink::{EventSink, EventStream};
