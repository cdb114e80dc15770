//! UseCase: 対局開始処理
//!
//! 準備完了から遅延して呼ばれる。その間にリセットや退出が起きていれば何もしない。

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, ServerEvent, SessionRepository};

use super::broadcast_or_warn;

/// 対局開始のユースケース
pub struct StartMatchUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl StartMatchUseCase {
    /// 新しい StartMatchUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// まだ対局を始められる状態なら Room 全員に `gameStart` を送る
    ///
    /// # Returns
    ///
    /// `gameStart` を送ったかどうか
    pub async fn execute(&self, room_id: &RoomId) -> bool {
        let Some(snapshot) = self.repository.startable_match(room_id).await else {
            tracing::debug!("Room '{}' is no longer ready to start", room_id);
            return false;
        };
        tracing::info!("Match started in room '{}'", room_id);

        broadcast_or_warn(
            self.message_pusher.as_ref(),
            &snapshot.members,
            ServerEvent::GameStart {
                board: snapshot.board,
                current_turn: snapshot.current_turn,
            },
        )
        .await;
        true
    }
}
