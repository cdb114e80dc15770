//! UseCase: チャット送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendChatUseCase::execute() メソッド
//! - 送信者名がクライアントの申告ではなく Room のニックネームになること
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーの発言が Room 全員（送信者を含む）に届く
//! - 異常系：空のメッセージ、メンバーでないコネクション

use std::sync::Arc;

use sanmoku_shared::time::Clock;

use crate::domain::{
    ConnectionId, GameError, MessagePusher, RoomId, ServerEvent, SessionRepository, Timestamp,
};

use super::broadcast_or_warn;

/// チャット送信のユースケース
pub struct SendChatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendChatUseCase {
    /// 新しい SendChatUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// チャットを Room のログに追加し、Room 全員に `newMessage` を送る
    ///
    /// # Errors
    ///
    /// `RoomNotFound` / `PlayerNotFound` / `EmptyMessage`
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
        text: &str,
    ) -> Result<(), GameError> {
        let now = Timestamp::new(self.clock.now_millis());
        let posted = self
            .repository
            .append_chat(room_id, connection_id, text, now)
            .await?;
        tracing::debug!(
            "'{}' sent a message in room '{}'",
            posted.entry.sender,
            room_id
        );

        broadcast_or_warn(
            self.message_pusher.as_ref(),
            &posted.members,
            ServerEvent::Chat(posted.entry),
        )
        .await;
        Ok(())
    }
}
