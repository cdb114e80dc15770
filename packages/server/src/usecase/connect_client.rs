//! UseCase: コネクション接続処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// コネクション接続のユースケース
///
/// 接続直後はどの Room にも属さないため、送信先として登録するだけ。
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// コネクションを送信先として登録
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        tracing::info!("Connection '{}' opened", connection_id);
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
    }
}
