use crate::types::constants::*;
use crate::types::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

fn default_true() -> bool {
    true
}

fn default_auth_headers() -> BTreeMap<String, String> {
    BTreeMap::from([(
        "Content-Type".to_string(),
        DEFAULT_AUTH_CONTENT_TYPE.to_string(),
    )])
}

/// Auth endpoint descriptor for private and presence channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PusherAuth {
    pub endpoint: String,
    #[serde(default = "default_auth_headers")]
    pub headers: BTreeMap<String, String>,
}

/// Connection options as sent by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PusherOptions {
    pub auth: Option<PusherAuth>,
    pub cluster: Option<String>,
    pub host: Option<String>,
    /// Use TLS
    pub encrypted: bool,
    pub ws_port: u16,
    pub wss_port: u16,
    /// Milliseconds
    pub activity_timeout: u64,
    pub max_reconnection_attempts: u32,
    pub max_reconnect_gap_in_seconds: u64,
    /// Milliseconds
    pub pong_timeout: u64,
}

impl Default for PusherOptions {
    fn default() -> Self {
        Self {
            auth: None,
            cluster: None,
            host: None,
            encrypted: true,
            ws_port: DEFAULT_WS_PORT,
            wss_port: DEFAULT_WSS_PORT,
            activity_timeout: DEFAULT_ACTIVITY_TIMEOUT,
            max_reconnection_attempts: DEFAULT_MAX_RECONNECTION_ATTEMPTS,
            max_reconnect_gap_in_seconds: DEFAULT_MAX_RECONNECT_GAP,
            pong_timeout: DEFAULT_PONG_TIMEOUT,
        }
    }
}

/// Payload of the `init` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitArgs {
    pub app_key: String,
    #[serde(default)]
    pub pusher_options: PusherOptions,
    #[serde(default = "default_true")]
    pub enable_logging: bool,
}

/// Where the socket connects: an explicit host or a named cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSelection {
    Host(String),
    Cluster(String),
}

impl HostSelection {
    /// Picks the cluster when one is given, the explicit host otherwise.
    /// Empty strings count as absent.
    pub fn resolve(host: Option<&str>, cluster: Option<&str>) -> Result<Self> {
        let non_empty = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(cluster) = non_empty(cluster) {
            Ok(Self::Cluster(cluster))
        } else if let Some(host) = non_empty(host) {
            Ok(Self::Host(host))
        } else {
            Err(BridgeError::Init(
                "Either a host or a cluster is required".to_string(),
            ))
        }
    }

    /// Hostname the socket connects to
    pub fn hostname(&self) -> String {
        match self {
            Self::Host(host) => host.clone(),
            Self::Cluster(cluster) => format!("ws-{}.pusher.com", cluster),
        }
    }
}

/// Validated auth endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoint {
    pub url: Url,
    pub headers: BTreeMap<String, String>,
}

/// Immutable client configuration, fixed when the client is constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub app_key: String,
    pub host: HostSelection,
    pub port: u16,
    pub use_tls: bool,
    pub activity_timeout: Duration,
    pub max_reconnection_attempts: u32,
    pub max_reconnect_gap: Duration,
    pub pong_timeout: Duration,
    pub auth: Option<AuthEndpoint>,
    pub enable_logging: bool,
}

impl ClientConfig {
    /// Validates host arguments into a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Init`] when the app key is empty, neither host
    /// nor cluster is usable, or the auth endpoint is not a valid URL.
    pub fn from_args(args: InitArgs) -> Result<Self> {
        if args.app_key.trim().is_empty() {
            return Err(BridgeError::Init("App key is required".to_string()));
        }

        let options = args.pusher_options;
        let host = HostSelection::resolve(options.host.as_deref(), options.cluster.as_deref())?;

        let auth = options
            .auth
            .map(|auth| {
                Url::parse(&auth.endpoint)
                    .map(|url| AuthEndpoint {
                        url,
                        headers: auth.headers,
                    })
                    .map_err(|e| {
                        BridgeError::Init(format!(
                            "Invalid auth endpoint '{}': {}",
                            auth.endpoint, e
                        ))
                    })
            })
            .transpose()?;

        let config = Self {
            app_key: args.app_key,
            host,
            port: if options.encrypted {
                options.wss_port
            } else {
                options.ws_port
            },
            use_tls: options.encrypted,
            activity_timeout: Duration::from_millis(options.activity_timeout),
            max_reconnection_attempts: options.max_reconnection_attempts,
            max_reconnect_gap: Duration::from_secs(options.max_reconnect_gap_in_seconds),
            pong_timeout: Duration::from_millis(options.pong_timeout),
            auth,
            enable_logging: args.enable_logging,
        };

        // Reject hosts that cannot form a socket URL
        config.endpoint_url()?;
        Ok(config)
    }

    /// Socket URL the SDK connects to
    pub fn endpoint_url(&self) -> Result<Url> {
        let scheme = if self.use_tls { "wss" } else { "ws" };
        let raw = format!(
            "{}://{}:{}/app/{}",
            scheme,
            self.host.hostname(),
            self.port,
            self.app_key
        );

        let mut url = Url::parse(&raw)
            .map_err(|e| BridgeError::Init(format!("Invalid socket URL '{}': {}", raw, e)))?;
        url.query_pairs_mut()
            .append_pair("protocol", &PROTOCOL_VERSION.to_string())
            .append_pair("client", CLIENT_NAME)
            .append_pair("version", env!("CARGO_PKG_VERSION"))
            .append_pair("flash", "false");

        Ok(url)
    }
}
