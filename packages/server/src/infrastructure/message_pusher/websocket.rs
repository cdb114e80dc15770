//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - コネクションごとの `UnboundedSender` を管理
//! - `ServerEvent` を JSON フレームにエンコードして送信（push_to, broadcast）
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われ、
//! ここでは生成された sender を受け取ってフレームの送信だけを行う。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, ServerEvent},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のコネクションの sender
    ///
    /// Key: connection_id (String)
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<String, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<String, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(event: &ServerEvent) -> Result<String, MessagePushError> {
        let message = ServerMessage::from(event);
        serde_json::to_string(&message).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id.as_str().to_string(), sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id.as_str());
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(connection_id.as_str()) else {
            return Err(MessagePushError::ClientNotFound(
                connection_id.as_str().to_string(),
            ));
        };
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(target.as_str()) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(frame.clone()) {
                        tracing::warn!("Failed to push '{}' to '{}': {}", event.name(), target, e);
                    }
                }
                None => {
                    tracing::warn!(
                        "Connection '{}' not found during broadcast, skipping",
                        target
                    );
                }
            }
        }
        tracing::debug!(
            "Broadcasted '{}' to {} connection(s)",
            event.name(),
            targets.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Nickname;
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定のコネクションへの送信とフレームの形
    // - broadcast: 複数コネクションへの送信
    // - エラーハンドリング（存在しないコネクション、閉じたチャンネル）
    //
    // 【なぜこのテストが必要か】
    // - UseCase が発行した ServerEvent はここで初めてワイヤーフォーマットになる
    // - 1 つのコネクションの失敗が他の送信を止めないことを保証する
    // ========================================

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<String, PusherChannel>>>,
    ) {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(clients.clone());
        (pusher, clients)
    }

    fn player_left(nickname: &str) -> ServerEvent {
        ServerEvent::PlayerLeft {
            nickname: Nickname::new(nickname.to_string()).unwrap(),
        }
    }

    fn parse(frame: Option<String>) -> Value {
        serde_json::from_str(&frame.expect("frame")).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_encodes_event_frame() {
        // テスト項目: 特定のコネクションに JSON フレームを送信できる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let c1 = ConnectionId::from_raw("c1");
        pusher.register_client(c1.clone(), tx).await;

        // when (操作):
        let result = pusher
            .push_to(
                &c1,
                &ServerEvent::GameError {
                    message: "Cell already occupied.".to_string(),
                },
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            parse(rx.recv().await),
            json!({"event": "gameError", "data": "Cell already occupied."})
        );
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないコネクションへの送信はエラーを返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();

        // when (操作):
        let result = pusher
            .push_to(&ConnectionId::from_raw("missing"), &player_left("Bob"))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_push_to_closed_channel_fails() {
        // テスト項目: 受信側が閉じていると PushFailed になる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, rx) = mpsc::unbounded_channel();
        let c1 = ConnectionId::from_raw("c1");
        pusher.register_client(c1.clone(), tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&c1, &player_left("Bob")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_missing_connection() {
        // テスト項目: 一部のコネクションが存在しなくてもブロードキャストは成功する
        // given (前提条件):
        let (pusher, clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let c1 = ConnectionId::from_raw("c1");
        let c2 = ConnectionId::from_raw("c2");
        pusher.register_client(c1.clone(), tx1).await;
        pusher.register_client(c2.clone(), tx2).await;

        // when (操作):
        let targets = vec![c1, ConnectionId::from_raw("gone"), c2];
        let result = pusher.broadcast(&targets, &player_left("Bob")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let expected = json!({"event": "playerLeft", "data": "Bob"});
        assert_eq!(parse(rx1.recv().await), expected);
        assert_eq!(parse(rx2.recv().await), expected);
        assert_eq!(clients.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unregister_removes_connection() {
        // テスト項目: 登録解除したコネクションには送信できない
        // given (前提条件):
        let (pusher, clients) = create_test_pusher();
        let (tx, _rx) = mpsc::unbounded_channel();
        let c1 = ConnectionId::from_raw("c1");
        pusher.register_client(c1.clone(), tx).await;

        // when (操作):
        pusher.unregister_client(&c1).await;

        // then (期待する結果):
        assert!(clients.lock().await.is_empty());
        assert!(pusher.push_to(&c1, &player_left("Bob")).await.is_err());
    }
}
