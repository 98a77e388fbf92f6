// Module declarations
mod connection;
mod controller;
mod logger;
mod options;

// Public API exports
pub use connection::ConnectionState;
pub use controller::{ConnectionController, Lifecycle};
pub use logger::BridgeLogger;
pub use options::{AuthEndpoint, ClientConfig, HostSelection, InitArgs, PusherAuth, PusherOptions};
