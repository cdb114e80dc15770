//! WebSocket connection handlers.
//!
//! 1 コネクションにつき 2 つのタスクを動かす:
//! - 受信タスク: フレームをデコードしてイベントループに渡す
//! - 送信タスク（pusher_loop）: MessagePusher から届いたフレームをソケットに書く
//!
//! どちらかが終わればもう一方も止め、切断をイベントループに知らせる。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientIntent, ConnectionId},
    infrastructure::dto::websocket::ClientEvent,
    ui::{event_loop::Command, state::AppState},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and writes them to the WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

/// テキストフレームをイベントループへの Command に変換する
///
/// JSON としてデコードできないフレーム、未知のイベントは `None`（捨てる）。
fn command_for_frame(connection_id: &ConnectionId, text: &str) -> Option<Command> {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Dropping undecodable frame from '{}': {}", connection_id, e);
            return None;
        }
    };

    let command = match ClientIntent::try_from(event) {
        Ok(intent) => Command::Intent {
            connection_id: connection_id.clone(),
            intent,
        },
        Err(invalid) => Command::Rejected {
            connection_id: connection_id.clone(),
            event: invalid.event,
            feedback: invalid.feedback(),
        },
    };
    Some(command)
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    if state
        .commands
        .send(Command::Connect {
            connection_id: connection_id.clone(),
            sender: tx,
        })
        .is_err()
    {
        tracing::error!("Event loop is not running, closing '{}'", connection_id);
        return;
    }

    let (sender, mut receiver) = socket.split();

    let recv_connection_id = connection_id.clone();
    let recv_state = state.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::trace!("Received from '{}': {}", recv_connection_id, text.as_str());
                    let Some(command) = command_for_frame(&recv_connection_id, &text) else {
                        continue;
                    };
                    if recv_state.commands.send(command).is_err() {
                        tracing::error!("Event loop is not running");
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to write frames pushed by the server
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state
        .commands
        .send(Command::Disconnected {
            connection_id: connection_id.clone(),
        })
        .is_err()
    {
        tracing::warn!("Event loop is not running, '{}' not cleaned up", connection_id);
    }
}
