/// Channel name prefixes (checked most specific first)
pub const PRIVATE_ENCRYPTED_PREFIX: &str = "private-encrypted-";
pub const PRIVATE_PREFIX: &str = "private-";
pub const PRESENCE_PREFIX: &str = "presence-";

/// Host method names
pub mod methods {
    pub const INIT: &str = "init";
    pub const CONNECT: &str = "connect";
    pub const DISCONNECT: &str = "disconnect";
    pub const GET_SOCKET_ID: &str = "getSocketId";
    pub const SUBSCRIBE: &str = "subscribe";
    pub const UNSUBSCRIBE: &str = "unsubscribe";
    pub const BIND: &str = "bind";
    pub const UNBIND: &str = "unbind";
    pub const TRIGGER: &str = "trigger";
}

/// Reply error codes
pub mod error_codes {
    pub const INVALID_ARGUMENTS: &str = "INVALID_ARGUMENTS";
    pub const INIT_ERROR: &str = "INIT_ERROR";
    pub const TRIGGER_ERROR: &str = "TRIGGER_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
    pub const NOT_INITIALIZED: &str = "NOT_INITIALIZED";
    pub const BRIDGE_CLOSED: &str = "BRIDGE_CLOSED";
}

/// Lifecycle events bound on every subscribed channel
pub mod channel_events {
    pub const SUBSCRIPTION_SUCCEEDED: &str = "pusher:subscription_succeeded";
    pub const SUBSCRIPTION_ERROR: &str = "pusher:subscription_error";

    pub const ALL: [&str; 2] = [SUBSCRIPTION_SUCCEEDED, SUBSCRIPTION_ERROR];
}

/// Membership events bound additionally on presence channels
pub mod presence_events {
    pub const MEMBER_ADDED: &str = "pusher:member_added";
    pub const MEMBER_REMOVED: &str = "pusher:member_removed";

    pub const ALL: [&str; 2] = [MEMBER_ADDED, MEMBER_REMOVED];
}

/// Wire protocol revision advertised in the socket URL
pub const PROTOCOL_VERSION: u8 = 7;

/// Client name advertised in the socket URL
pub const CLIENT_NAME: &str = "pusher-bridge-rs";

/// Default ports (plain / TLS)
pub const DEFAULT_WS_PORT: u16 = 80;
pub const DEFAULT_WSS_PORT: u16 = 443;

/// Default activity timeout (milliseconds)
pub const DEFAULT_ACTIVITY_TIMEOUT: u64 = 120_000;

/// Default pong timeout (milliseconds)
pub const DEFAULT_PONG_TIMEOUT: u64 = 30_000;

pub const DEFAULT_MAX_RECONNECTION_ATTEMPTS: u32 = 6;

/// Default maximum gap between reconnect attempts (seconds)
pub const DEFAULT_MAX_RECONNECT_GAP: u64 = 30;

/// Content type sent to the auth endpoint when the host gives no headers
pub const DEFAULT_AUTH_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Tracing target for bridge diagnostics
pub const LOG_TARGET: &str = "pusher_bridge";
