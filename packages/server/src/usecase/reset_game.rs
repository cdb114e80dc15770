//! UseCase: 対局リセット処理

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, ServerEvent, SessionRepository};

use super::{WAITING_MESSAGE, broadcast_or_warn};

/// 対局リセットのユースケース
pub struct ResetGameUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ResetGameUseCase {
    /// 新しい ResetGameUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 盤面を初期化し、Room 全員に `gameReset` と `gameWaiting` を送る
    ///
    /// Room がなければ何もせず `false` を返す。
    pub async fn execute(&self, room_id: &RoomId) -> bool {
        let Some(snapshot) = self.repository.reset_room(room_id).await else {
            tracing::debug!("Ignoring reset for unknown room '{}'", room_id);
            return false;
        };
        tracing::info!("Room '{}' was reset", room_id);

        let pusher = self.message_pusher.as_ref();
        broadcast_or_warn(
            pusher,
            &snapshot.members,
            ServerEvent::GameReset {
                board: snapshot.board,
                current_turn: snapshot.current_turn,
            },
        )
        .await;
        broadcast_or_warn(
            pusher,
            &snapshot.members,
            ServerEvent::GameWaiting {
                message: WAITING_MESSAGE.to_string(),
            },
        )
        .await;
        true
    }
}
