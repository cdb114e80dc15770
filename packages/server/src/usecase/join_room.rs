//! UseCase: Room への参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加時に送られるイベントの宛先と順序
//!
//! ### なぜこのテストが必要か
//! - 参加は本人への返信と Room 全体への通知が混ざる唯一のイベント
//! - 2 人目の参加で準備待ちに入ることをクライアントが知る必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人目・2 人目の参加
//! - 異常系：満室、ニックネーム重複（状態は変わらない）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, GameError, JoinOutcome, MessagePusher, Nickname, RoomId, ServerEvent,
    SessionRepository,
};

use super::{broadcast_or_warn, push_or_warn};

/// 2 人揃ったとき、およびリセット後に送る案内
pub const WAITING_MESSAGE: &str = "Wait for both players to be ready.";

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Room に参加する
    ///
    /// 送信順:
    /// 1. 本人に `roleAssigned`
    /// 2. Room 全員に `playerConnected` と参加のお知らせ
    /// 3. 本人に `gameHistoryUpdate`
    /// 4. 2 人揃ったら Room 全員に `gameWaiting`
    ///
    /// # Errors
    ///
    /// `RoomFull` / `DuplicateNickname` / `AlreadyJoined`。このとき状態は変わらず、何も送信しない。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: &RoomId,
        nickname: Nickname,
    ) -> Result<JoinOutcome, GameError> {
        let outcome = self
            .repository
            .join(room_id, connection_id.clone(), nickname.clone())
            .await?;
        tracing::info!(
            "'{}' joined room '{}' as {}",
            nickname,
            room_id,
            outcome.symbol
        );

        let pusher = self.message_pusher.as_ref();
        push_or_warn(
            pusher,
            connection_id,
            ServerEvent::RoleAssigned {
                symbol: outcome.symbol,
                current_turn: outcome.current_turn,
                opponent: outcome.opponent.clone(),
            },
        )
        .await;
        broadcast_or_warn(
            pusher,
            &outcome.members,
            ServerEvent::PlayerConnected {
                nickname: nickname.clone(),
                symbol: outcome.symbol,
                players: outcome.roster.clone(),
            },
        )
        .await;
        broadcast_or_warn(
            pusher,
            &outcome.members,
            ServerEvent::SystemNotice {
                message: format!("{nickname} joined the room."),
            },
        )
        .await;

        let history = self.repository.history(room_id).await;
        push_or_warn(pusher, connection_id, ServerEvent::HistoryUpdate(history)).await;

        if outcome.is_room_full() {
            broadcast_or_warn(
                pusher,
                &outcome.members,
                ServerEvent::GameWaiting {
                    message: WAITING_MESSAGE.to_string(),
                },
            )
            .await;
        }

        Ok(outcome)
    }
}
