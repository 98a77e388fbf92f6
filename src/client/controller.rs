use super::{BridgeLogger, ClientConfig, ConnectionState, InitArgs};
use crate::messaging::EventSink;
use crate::sdk::{PusherSdk, SdkFactory};
use crate::types::{BridgeError, Result};
use std::sync::Arc;

/// Client lifecycle as seen by the bridge.
///
/// Connection progress past `Configured` belongs to the SDK and is read
/// through [`ConnectionController::connection_state`].
pub enum Lifecycle {
    Uninitialized,
    Configured {
        config: ClientConfig,
        sdk: Arc<dyn PusherSdk>,
    },
}

/// Owns the single SDK client and its configuration.
///
/// The controller is created uninitialized with the factory that will build
/// the SDK and the sink every SDK callback reports to.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pusher_bridge::client::{ConnectionController, InitArgs};
/// use pusher_bridge::messaging::EventSink;
/// use pusher_bridge::sdk::MemorySdkFactory;
///
/// let mut controller =
///     ConnectionController::new(Arc::new(MemorySdkFactory::new()), EventSink::new());
///
/// let args: InitArgs = serde_json::from_str(
///     r#"{"appKey": "app-key", "pusherOptions": {"cluster": "eu"}}"#,
/// )
/// .unwrap();
/// controller.initialize(args).unwrap();
/// controller.connect().unwrap();
/// assert!(controller.socket_id().is_some());
/// ```
pub struct ConnectionController {
    factory: Arc<dyn SdkFactory>,
    sink: EventSink,
    lifecycle: Lifecycle,
    log: BridgeLogger,
}

impl ConnectionController {
    pub fn new(factory: Arc<dyn SdkFactory>, sink: EventSink) -> Self {
        Self {
            factory,
            sink,
            lifecycle: Lifecycle::Uninitialized,
            log: BridgeLogger::default(),
        }
    }

    /// Validates `args` and constructs the SDK client.
    ///
    /// A second call after a successful one returns `Ok(())` and leaves the
    /// existing client and configuration untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Init`] if the configuration is rejected or the
    /// SDK cannot be constructed; the controller stays uninitialized.
    pub fn initialize(&mut self, args: InitArgs) -> Result<()> {
        if self.is_initialized() {
            self.log
                .debug(format_args!("Client already initialized, keeping existing configuration"));
            return Ok(());
        }

        // The flag applies from here on, even if the rest of init fails
        self.log = BridgeLogger::new(args.enable_logging);
        let log = self.log;

        let config = ClientConfig::from_args(args).inspect_err(|e| {
            log.error(format_args!("{}", e));
        })?;

        let sdk = self
            .factory
            .create(&config, self.sink.clone())
            .map_err(|e| {
                log.error(format_args!("SDK construction failed: {}", e));
                BridgeError::Init(e.to_string())
            })?;

        self.lifecycle = Lifecycle::Configured { config, sdk };
        self.log.debug(format_args!("Pusher initialized"));
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Configured { .. })
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn config(&self) -> Option<&ClientConfig> {
        match &self.lifecycle {
            Lifecycle::Configured { config, .. } => Some(config),
            Lifecycle::Uninitialized => None,
        }
    }

    /// Fails with [`BridgeError::NotInitialized`] until `initialize` succeeds
    pub fn ensure_initialized(&self) -> Result<()> {
        self.sdk().map(|_| ())
    }

    /// The live SDK client
    pub fn sdk(&self) -> Result<&Arc<dyn PusherSdk>> {
        match &self.lifecycle {
            Lifecycle::Configured { sdk, .. } => Ok(sdk),
            Lifecycle::Uninitialized => Err(BridgeError::NotInitialized),
        }
    }

    pub fn logger(&self) -> BridgeLogger {
        self.log
    }

    /// Asks the SDK to start connecting. Progress arrives on the event stream.
    pub fn connect(&self) -> Result<()> {
        self.sdk()?.connect();
        self.log.debug(format_args!("Connecting"));
        Ok(())
    }

    /// Asks the SDK to tear the connection down
    pub fn disconnect(&self) -> Result<()> {
        self.sdk()?.disconnect();
        self.log.debug(format_args!("Disconnected"));
        Ok(())
    }

    /// Current session id, `None` when uninitialized or not connected
    pub fn socket_id(&self) -> Option<String> {
        self.sdk().ok().and_then(|sdk| sdk.socket_id())
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.sdk()
            .map(|sdk| sdk.connection_state())
            .unwrap_or_default()
    }
}
