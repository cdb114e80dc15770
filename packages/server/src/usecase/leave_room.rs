//! UseCase: Room からの退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 退出時に残ったメンバーへ playerLeft とお知らせが届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人のうち 1 人が退出
//! - エッジケース：最後の 1 人が退出して Room が破棄される
//! - 異常系：メンバーでないコネクションの退出（何も起きない）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Departure, MessagePusher, RoomId, ServerEvent, SessionRepository,
};

use super::broadcast_or_warn;

/// Room 退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Room から退出する
    ///
    /// メンバーでなければ何もせず `None` を返す。
    pub async fn execute(&self, connection_id: &ConnectionId, room_id: &RoomId) -> Option<Departure> {
        let departure = self.repository.remove_player(room_id, connection_id).await?;
        tracing::info!("'{}' left room '{}'", departure.nickname, room_id);
        notify_departure(self.message_pusher.as_ref(), &departure).await;
        Some(departure)
    }
}

/// 残ったメンバーに退出を知らせる
pub(super) async fn notify_departure(pusher: &dyn MessagePusher, departure: &Departure) {
    broadcast_or_warn(
        pusher,
        &departure.members,
        ServerEvent::PlayerLeft {
            nickname: departure.nickname.clone(),
        },
    )
    .await;
    broadcast_or_warn(
        pusher,
        &departure.members,
        ServerEvent::SystemNotice {
            message: format!("{} left the room.", departure.nickname),
        },
    )
    .await;
}
