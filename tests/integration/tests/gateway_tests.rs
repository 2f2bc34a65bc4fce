//! Gateway Integration Tests
//!
//! Runs the API and the link gateway side by side: a socket that identifies
//! receives the owner's list, then a fresh list after every change made
//! through the API.
//!
//! Requires the same environment as `api_tests`.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use integration_tests::{
    assert_json, check_test_env, fixtures::*, TestGateway, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Next text frame as JSON; close frames come back as `{"close": code}`
async fn next_frame(socket: &mut Socket) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket ended")
            .expect("socket error");
        match msg {
            Message::Text(text) => return serde_json::from_str(&text).unwrap(),
            Message::Close(frame) => {
                return json!({ "close": frame.map(|f| u16::from(f.code)) });
            }
            _ => {}
        }
    }
}

async fn send(socket: &mut Socket, frame: Value) {
    socket.send(Message::Text(frame.to_string())).await.unwrap();
}

async fn identified_socket(gateway: &TestGateway, token: &str) -> Socket {
    let (mut socket, _) = connect_async(gateway.ws_url()).await.unwrap();

    let hello = next_frame(&mut socket).await;
    assert_eq!(hello["op"], 10);
    assert!(hello["d"]["heartbeat_interval"].as_u64().unwrap() > 0);

    send(&mut socket, json!({ "op": 2, "d": { "token": token } })).await;
    socket
}

async fn register(server: &TestServer) -> AuthResponse {
    let response = server
        .post("/auth/register", &RegisterRequest::unique())
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

#[tokio::test]
async fn test_snapshot_follows_link_changes() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let auth = register(&server).await;

    let mut socket = identified_socket(&gateway, &auth.access_token).await;
    let initial = next_frame(&mut socket).await;
    assert_eq!(initial["op"], 0);
    assert_eq!(initial["t"], "LINKS_SNAPSHOT");
    assert_eq!(initial["d"]["links"], json!([]));

    let response = server
        .post_auth(
            "/links",
            &auth.access_token,
            &custom_link("Live", "https://live.example.com"),
        )
        .await
        .unwrap();
    let link: LinkResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let created = next_frame(&mut socket).await;
    assert_eq!(created["t"], "LINKS_SNAPSHOT");
    assert_eq!(created["d"]["cause"], "LINK_CREATED");
    assert_eq!(created["d"]["links"][0]["id"], link.id.as_str());
    assert!(created["s"].as_u64().unwrap() > initial["s"].as_u64().unwrap());

    let response = server
        .delete_auth(&format!("/links/{}", link.id), &auth.access_token)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let deleted = next_frame(&mut socket).await;
    assert_eq!(deleted["d"]["cause"], "LINK_DELETED");
    assert_eq!(deleted["d"]["links"], json!([]));
}

#[tokio::test]
async fn test_heartbeat_is_acknowledged() {
    if !check_test_env().await {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let (mut socket, _) = connect_async(gateway.ws_url()).await.unwrap();
    assert_eq!(next_frame(&mut socket).await["op"], 10);

    send(&mut socket, json!({ "op": 1, "d": null })).await;
    assert_eq!(next_frame(&mut socket).await["op"], 11);
}

#[tokio::test]
async fn test_invalid_token_closes_socket() {
    if !check_test_env().await {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut socket = identified_socket(&gateway, "not-a-token").await;

    assert_eq!(next_frame(&mut socket).await["close"], 4004);
}

#[tokio::test]
async fn test_unknown_opcode_closes_socket() {
    if !check_test_env().await {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let (mut socket, _) = connect_async(gateway.ws_url()).await.unwrap();
    assert_eq!(next_frame(&mut socket).await["op"], 10);

    send(&mut socket, json!({ "op": 42, "d": null })).await;
    assert_eq!(next_frame(&mut socket).await["close"], 4001);
}
