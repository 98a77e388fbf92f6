use crate::channel::{BindingTable, ChannelRegistry, ChannelType, Unbound, authorize_trigger};
use crate::client::{ConnectionController, InitArgs};
use crate::messaging::{EventSink, EventStream};
use crate::sdk::SdkFactory;
use crate::types::message::{binding_args, channel_name_arg, decode_json};
use crate::types::{BridgeError, ClientEvent, MethodCall, Reply, Result, methods};
use serde_json::Value;
use std::sync::Arc;

/// Request/response surface of the bridge.
///
/// Handles one [`MethodCall`] at a time and returns exactly one [`Reply`].
/// A failed request leaves the connection, the subscriptions and the
/// bindings as they were.
pub struct Bridge {
    controller: ConnectionController,
    registry: ChannelRegistry,
    bindings: BindingTable,
    sink: EventSink,
}

impl Bridge {
    pub fn new(factory: Arc<dyn SdkFactory>) -> Self {
        let sink = EventSink::new();
        Self {
            controller: ConnectionController::new(factory, sink.clone()),
            registry: ChannelRegistry::new(),
            bindings: BindingTable::new(),
            sink,
        }
    }

    /// Outbound event sink shared with the SDK
    pub fn events(&self) -> &EventSink {
        &self.sink
    }

    /// Attaches the single event listener
    pub fn listen(&self) -> EventStream {
        self.sink.listen()
    }

    pub fn controller(&self) -> &ConnectionController {
        &self.controller
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Routes one request and converts the outcome into a reply
    pub fn handle(&mut self, call: MethodCall) -> Reply {
        let method = call.method.clone();
        self.dispatch(call).map_err(|err| {
            self.controller
                .logger()
                .error(format_args!("[{}] {} ({})", method, err, err.code()));
            err.into()
        })
    }

    fn dispatch(&mut self, call: MethodCall) -> Result<Value> {
        let MethodCall { method, arguments } = call;
        match method.as_str() {
            methods::INIT => {
                let args: InitArgs = decode_json(arguments)?;
                self.init(args)?;
            }
            methods::CONNECT => self.connect()?,
            methods::DISCONNECT => self.disconnect()?,
            methods::GET_SOCKET_ID => {
                return Ok(self.socket_id().map(Value::String).unwrap_or(Value::Null));
            }
            methods::SUBSCRIBE => {
                let channel_name = channel_name_arg(arguments)?;
                self.subscribe(&channel_name)?;
            }
            methods::UNSUBSCRIBE => {
                let channel_name = channel_name_arg(arguments)?;
                self.unsubscribe(&channel_name)?;
            }
            methods::BIND => {
                let (channel_name, event_name) = binding_args(arguments, "binding")?;
                self.bind(&channel_name, &event_name)?;
            }
            methods::UNBIND => {
                let (channel_name, event_name) = binding_args(arguments, "unbind")?;
                self.unbind(&channel_name, &event_name)?;
            }
            methods::TRIGGER => {
                let event: ClientEvent = decode_json(arguments)?;
                self.trigger(&event)?;
            }
            _ => return Err(BridgeError::NotImplemented(method)),
        }
        Ok(Value::Null)
    }

    pub fn init(&mut self, args: InitArgs) -> Result<()> {
        self.controller.initialize(args)
    }

    pub fn connect(&self) -> Result<()> {
        self.controller.connect()
    }

    pub fn disconnect(&self) -> Result<()> {
        self.controller.disconnect()
    }

    pub fn socket_id(&self) -> Option<String> {
        self.controller.socket_id()
    }

    /// Subscribes once per name; repeated calls return the existing type
    pub fn subscribe(&mut self, channel_name: &str) -> Result<ChannelType> {
        if channel_name.is_empty() {
            return Err(BridgeError::InvalidArguments(
                "Missing channel name".to_string(),
            ));
        }

        let sdk = self.controller.sdk()?;
        let callback = self.sink.event_callback();
        let channel_type = self.registry.subscribe(sdk.as_ref(), channel_name, &callback);

        self.controller
            .logger()
            .debug(format_args!("Subscribed to {}", channel_name));
        Ok(channel_type)
    }

    pub fn unsubscribe(&mut self, channel_name: &str) -> Result<()> {
        if channel_name.is_empty() {
            return Err(BridgeError::InvalidArguments(
                "Missing channel name".to_string(),
            ));
        }

        let sdk = self.controller.sdk()?;
        self.registry.unsubscribe(sdk.as_ref(), channel_name);

        self.controller
            .logger()
            .debug(format_args!("Unsubscribed from {}", channel_name));
        Ok(())
    }

    pub fn bind(&mut self, channel_name: &str, event_name: &str) -> Result<()> {
        self.controller.ensure_initialized()?;
        let log = self.controller.logger();

        let replaced = self.bindings.bind(
            &self.registry,
            channel_name,
            event_name,
            self.sink.event_callback(),
        )?;
        if let Some(previous) = replaced {
            log.warn(format_args!(
                "[BIND] {} on {} replaced callback {}, which stays attached",
                event_name, channel_name, previous
            ));
        }

        log.debug(format_args!("[BIND] {}", event_name));
        Ok(())
    }

    pub fn unbind(&mut self, channel_name: &str, event_name: &str) -> Result<Unbound> {
        self.controller.ensure_initialized()?;
        let unbound = self
            .bindings
            .unbind(&self.registry, channel_name, event_name)?;

        self.controller
            .logger()
            .debug(format_args!("[UNBIND] {}", event_name));
        Ok(unbound)
    }

    /// Publishes a client event after the channel policy allows it
    pub fn trigger(&self, event: &ClientEvent) -> Result<()> {
        self.controller.ensure_initialized()?;

        let channel_type = authorize_trigger(&event.channel_name)
            .map_err(|denial| BridgeError::Trigger(denial.message().to_string()))?;

        let channel = match channel_type {
            ChannelType::Presence => self.registry.find_presence(&event.channel_name),
            _ => self.registry.find(&event.channel_name),
        }
        .ok_or_else(|| {
            BridgeError::NotFound(format!(
                "Channel '{}' is not subscribed",
                event.channel_name
            ))
        })?;

        channel
            .trigger(&event.event_name, event.data.as_deref().unwrap_or_default())
            .map_err(|e| BridgeError::Trigger(e.to_string()))?;

        self.controller
            .logger()
            .debug(format_args!("[TRIGGER] {}", event.event_name));
        Ok(())
    }
}
