use super::Bridge;
use crate::messaging::{EventSink, EventStream};
use crate::types::{MethodCall, Reply, ReplyError, error_codes};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Pending requests the service accepts before callers wait
const REQUEST_QUEUE_CAPACITY: usize = 100;

type Request = (MethodCall, oneshot::Sender<Reply>);

/// Runs a [`Bridge`] on its own task so requests are handled one at a time,
/// in arrival order.
pub struct BridgeService;

impl BridgeService {
    /// Spawns the command loop. The loop ends when every handle is dropped.
    pub fn spawn(bridge: Bridge) -> (BridgeHandle, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Request>(REQUEST_QUEUE_CAPACITY);
        let sink = bridge.events().clone();

        let task = tokio::spawn(async move {
            let mut bridge = bridge;
            while let Some((call, reply_tx)) = rx.recv().await {
                let reply = bridge.handle(call);
                if reply_tx.send(reply).is_err() {
                    bridge
                        .controller()
                        .logger()
                        .debug(format_args!("Caller dropped before reply was delivered"));
                }
            }
            bridge
                .controller()
                .logger()
                .debug(format_args!("Bridge command loop finished"));
        });

        (BridgeHandle { tx, sink }, task)
    }
}

/// Cloneable handle for issuing requests and attaching the event listener
#[derive(Clone)]
pub struct BridgeHandle {
    tx: mpsc::Sender<Request>,
    sink: EventSink,
}

impl BridgeHandle {
    /// Issues `method` and waits for its reply
    pub async fn call(&self, method: &str, arguments: Value) -> Reply {
        self.send(MethodCall::new(method, arguments)).await
    }

    pub async fn send(&self, call: MethodCall) -> Reply {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send((call, reply_tx)).await.is_err() {
            return Err(closed());
        }
        reply_rx.await.unwrap_or_else(|_| Err(closed()))
    }

    /// Attaches the single event listener, replacing any previous one
    pub fn listen(&self) -> EventStream {
        self.sink.listen()
    }

    /// Stops event delivery
    pub fn detach(&self) {
        self.sink.detach();
    }
}

fn closed() -> ReplyError {
    ReplyError {
        code: error_codes::BRIDGE_CLOSED.to_string(),
        message: "Bridge command loop is not running".to_string(),
        details: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::BridgeEvent;
    use crate::sdk::MemorySdkFactory;
    use crate::types::methods;
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Runs a short session to completion and returns everything logged
    async fn session_output(enable_logging: bool) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (handle, task, _factory) = spawn();
        let init = json!({
            "appKey": "k",
            "pusherOptions": {"cluster": "eu"},
            "enableLogging": enable_logging
        });
        handle.call(methods::INIT, init).await.unwrap();
        handle.call(methods::CONNECT, Value::Null).await.unwrap();
        let _ = handle.call("nope", Value::Null).await;
        drop(handle);
        task.await.unwrap();

        captured.contents()
    }

    fn spawn() -> (BridgeHandle, JoinHandle<()>, Arc<MemorySdkFactory>) {
        let factory = Arc::new(MemorySdkFactory::new());
        let (handle, task) = BridgeService::spawn(Bridge::new(factory.clone()));
        (handle, task, factory)
    }

    #[tokio::test]
    async fn test_requests_are_answered_in_order() {
        let (handle, _task, factory) = spawn();

        let init = json!({"appKey": "k", "pusherOptions": {"cluster": "eu"}, "enableLogging": false})
            .to_string();
        assert_eq!(handle.call(methods::INIT, json!(init)).await, Ok(Value::Null));
        assert_eq!(
            handle
                .call(methods::SUBSCRIBE, json!({"channelName": "private-room"}))
                .await,
            Ok(Value::Null)
        );

        // Queue several requests from separate tasks sharing one handle
        let first = handle.clone();
        let second = handle.clone();
        let (bind, trigger) = tokio::join!(
            first.call(
                methods::BIND,
                json!({"channelName": "private-room", "eventName": "a"})
            ),
            second.call(
                methods::TRIGGER,
                json!({"channelName": "private-room", "eventName": "a", "data": "1"})
            ),
        );
        assert_eq!(bind, Ok(Value::Null));
        assert_eq!(trigger, Ok(Value::Null));

        let channel = factory.last().unwrap().channel("private-room").unwrap();
        assert_eq!(channel.triggered(), vec![("a".to_string(), "1".to_string())]);
    }

    #[tokio::test]
    async fn test_listener_swap_and_detach() {
        let (handle, _task, _factory) = spawn();
        let init = json!({"appKey": "k", "pusherOptions": {"cluster": "eu"}});
        handle.call(methods::INIT, init).await.unwrap();

        let mut old = handle.listen();
        let mut current = handle.listen();
        handle.call(methods::CONNECT, Value::Null).await.unwrap();

        assert_eq!(old.recv().await, None);
        assert!(matches!(current.recv().await, Some(BridgeEvent::State(_))));

        handle.detach();
        handle.call(methods::DISCONNECT, Value::Null).await.unwrap();
        // Connected state from connect, then nothing after detach
        assert!(matches!(current.recv().await, Some(BridgeEvent::State(_))));
        assert_eq!(current.recv().await, None);
    }

    #[tokio::test]
    async fn test_disabled_logging_is_silent() {
        let output = session_output(false).await;
        assert!(output.is_empty(), "unexpected output: {}", output);
    }

    #[tokio::test]
    async fn test_enabled_logging_reaches_subscriber() {
        let output = session_output(true).await;
        assert!(output.contains("NOT_IMPLEMENTED"));
        assert!(output.contains("Bridge command loop finished"));
    }

    #[tokio::test]
    async fn test_unknown_method_reply() {
        let (handle, _task, _factory) = spawn();
        let err = handle.call("nope", Value::Null).await.unwrap_err();
        assert_eq!(err.code, "NOT_IMPLEMENTED");
    }

    #[tokio::test]
    async fn test_stopped_loop_replies_closed() {
        let (handle, task, _factory) = spawn();
        task.abort();
        let _ = task.await;

        let err = handle.call(methods::CONNECT, Value::Null).await.unwrap_err();
        assert_eq!(err.code, "BRIDGE_CLOSED");
    }
}
