//! Drives the bridge end to end against the in-process SDK and prints every
//! event the host listener receives.

use pusher_bridge::sdk::MemorySdkFactory;
use pusher_bridge::{Bridge, BridgeService};
use serde_json::{Value, json};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let factory = Arc::new(MemorySdkFactory::new());
    let (handle, task) = BridgeService::spawn(Bridge::new(factory.clone()));

    let mut events = handle.listen();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("<- {}", serde_json::to_string(&event).unwrap_or_default());
        }
    });

    let init = json!({
        "appKey": "demo-key",
        "pusherOptions": {"cluster": "eu", "encrypted": true},
        "enableLogging": true
    });
    handle.call("init", Value::String(init.to_string())).await?;
    handle.call("subscribe", json!({"channelName": "presence-lobby"})).await?;
    handle
        .call(
            "bind",
            json!({"channelName": "presence-lobby", "eventName": "client-wave"}),
        )
        .await?;
    handle.call("connect", Value::Null).await?;

    let socket_id = handle.call("getSocketId", Value::Null).await?;
    println!("socket id: {}", socket_id);

    if let Some(lobby) = factory.last().and_then(|sdk| sdk.channel("presence-lobby")) {
        lobby.deliver("pusher:member_added", Some(r#"{"user_id":"42"}"#), Some("42"));
        lobby.deliver("client-wave", Some("hello"), Some("42"));
    }

    let denied = handle
        .call(
            "trigger",
            json!({"channelName": "public-news", "eventName": "client-wave"}),
        )
        .await;
    println!("public trigger: {:?}", denied);

    handle
        .call(
            "trigger",
            json!({"channelName": "presence-lobby", "eventName": "client-wave", "data": "hi"}),
        )
        .await?;
    handle.call("disconnect", Value::Null).await?;

    handle.detach();
    printer.await?;
    drop(handle);
    task.await?;
    Ok(())
}
