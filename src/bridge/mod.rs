// Bridge module - host-facing request surface
mod dispatcher;
mod service;

pub use dispatcher::Bridge;
pub use service::{BridgeHandle, BridgeService};
