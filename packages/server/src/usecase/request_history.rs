//! UseCase: 対局履歴の要求処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, ServerEvent, SessionRepository};

use super::push_or_warn;

/// 対局履歴要求のユースケース
pub struct RequestHistoryUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RequestHistoryUseCase {
    /// 新しい RequestHistoryUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 要求したコネクションにだけ `gameHistoryUpdate` を返す（履歴がなければ空配列）
    ///
    /// Room のメンバーである必要はない。Room の指定がなければ空配列を返す。
    pub async fn execute(&self, connection_id: &ConnectionId, room_id: Option<&RoomId>) {
        let history = match room_id {
            Some(room_id) => self.repository.history(room_id).await,
            None => Vec::new(),
        };
        push_or_warn(
            self.message_pusher.as_ref(),
            connection_id,
            ServerEvent::HistoryUpdate(history),
        )
        .await;
    }
}
