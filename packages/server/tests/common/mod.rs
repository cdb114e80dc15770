//! Helpers shared by the integration tests.
//!
//! Boots the real axum server on an ephemeral port and talks to it with
//! `tokio-tungstenite` (WebSocket) and `reqwest` (HTTP).

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use sanmoku_server::{config::GameConfig, ui::Server};
use sanmoku_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::{net::TcpListener, net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const START_DELAY: Duration = Duration::from_millis(100);
const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Helper struct to manage server lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a test server on an ephemeral port
    pub async fn start() -> Self {
        let config = GameConfig {
            start_delay: START_DELAY,
            ..GameConfig::default()
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let server = Server::in_memory(&config, Arc::new(SystemClock));
        let handle = tokio::spawn(async move {
            let _ = server
                .serve(listener, async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        TestServer {
            addr,
            shutdown: Some(shutdown),
            handle,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

/// Helper struct wrapping one WebSocket client
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url()).await.unwrap();
        TestClient { stream }
    }

    /// Send `{"event": event, "data": data}`
    pub async fn emit(&mut self, event: &str, data: Value) {
        let frame = json!({"event": event, "data": data}).to_string();
        self.stream.send(Message::text(frame)).await.unwrap();
    }

    /// Receive the next event frame
    pub async fn recv(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Receive frames until one named `event` arrives, returning its data
    pub async fn recv_event(&mut self, event: &str) -> Value {
        loop {
            let frame = self.recv().await;
            if frame["event"] == event {
                return frame["data"].clone();
            }
        }
    }

    /// Receive frames until one named `event` arrives, returning the names seen on the way
    pub async fn recv_names_until(&mut self, event: &str) -> Vec<String> {
        let mut names = Vec::new();
        loop {
            let frame = self.recv().await;
            let name = frame["event"].as_str().unwrap_or_default().to_string();
            names.push(name.clone());
            if name == event {
                return names;
            }
        }
    }

    /// Assert that no frame arrives within `wait`
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(wait, self.stream.next()).await
        {
            panic!("expected no frame, got {}", text.as_str());
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }

    pub async fn join(&mut self, room: &str, nickname: &str) {
        self.emit("joinRoom", json!({"room": room, "nickname": nickname}))
            .await;
    }

    pub async fn ready(&mut self, room: &str) {
        self.emit("ready", json!({"room": room})).await;
    }

    pub async fn make_move(&mut self, room: &str, player: &str, index: i64) {
        self.emit(
            "makeMove",
            json!({"player": player, "index": index, "room": room}),
        )
        .await;
    }
}

/// Alice と Bob を `room` に参加させ、対局開始まで進める
pub async fn start_match(server: &TestServer, room: &str) -> (TestClient, TestClient) {
    let mut alice = TestClient::connect(server).await;
    alice.join(room, "Alice").await;
    alice.recv_event("gameHistoryUpdate").await;

    let mut bob = TestClient::connect(server).await;
    bob.join(room, "Bob").await;
    bob.recv_event("gameWaiting").await;
    alice.recv_event("gameWaiting").await;

    alice.ready(room).await;
    bob.ready(room).await;
    alice.recv_event("gameStart").await;
    bob.recv_event("gameStart").await;
    (alice, bob)
}
