//! UseCase: エラー通知処理
//!
//! イベントを処理できなかったとき、送信元に返すかどうかを決めて `gameError` を送る。

use std::sync::Arc;

use crate::domain::{ConnectionId, GameError, MessagePusher, ServerEvent};

use super::push_or_warn;

/// エラー通知のユースケース
pub struct ReportErrorUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ReportErrorUseCase {
    /// 新しい ReportErrorUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// ゲームのエラーを処理する
    ///
    /// 送信元が対処できるエラーだけを `gameError` として返し、残りはログに残して捨てる。
    pub async fn execute(&self, connection_id: &ConnectionId, event: &str, error: &GameError) {
        if !error.is_reported_to_sender() {
            tracing::debug!(
                "Dropping '{}' from '{}': {}",
                event,
                connection_id,
                error
            );
            return;
        }
        tracing::info!("Rejected '{}' from '{}': {}", event, connection_id, error);
        self.send(connection_id, error.to_string()).await;
    }

    /// 任意のエラーメッセージを送信元に返す
    pub async fn send(&self, connection_id: &ConnectionId, message: String) {
        push_or_warn(
            self.message_pusher.as_ref(),
            connection_id,
            ServerEvent::GameError { message },
        )
        .await;
    }
}
