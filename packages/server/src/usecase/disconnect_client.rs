//! UseCase: コネクション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 切断したコネクションが参加していた全 Room からの退出と通知
//!
//! ### なぜこのテストが必要か
//! - 切断は明示的な leaveRoom と違い、Room を指定しない
//! - 参加していた Room すべてで退出と同じ通知が出ることを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 つの Room に参加していたコネクションの切断
//! - エッジケース：どの Room にも参加していないコネクションの切断

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, SessionRepository};

use super::leave_room::notify_departure;

/// コネクション切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// コネクション切断を実行
    ///
    /// # Returns
    ///
    /// 退出した Room の一覧
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let mut departed = Vec::new();
        for room_id in self.repository.rooms_of(connection_id).await {
            let Some(departure) = self.repository.remove_player(&room_id, connection_id).await
            else {
                continue;
            };
            tracing::info!(
                "'{}' disconnected from room '{}'",
                departure.nickname,
                room_id
            );
            notify_departure(self.message_pusher.as_ref(), &departure).await;
            departed.push(room_id);
        }

        self.message_pusher.unregister_client(connection_id).await;
        tracing::info!("Connection '{}' closed", connection_id);
        departed
    }
}
