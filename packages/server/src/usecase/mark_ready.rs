//! UseCase: 準備完了処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomId, ServerEvent, SessionRepository};

use super::broadcast_or_warn;

/// 準備完了のユースケース
pub struct MarkReadyUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl MarkReadyUseCase {
    /// 新しい MarkReadyUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 準備完了にして Room 全員に `playerReady` を送る
    ///
    /// # Returns
    ///
    /// 2 人とも準備完了で対局の開始を予約すべきなら `true`。
    /// Room かプレイヤーが見つからなければ何もせず `false`。
    pub async fn execute(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        let Some(outcome) = self.repository.mark_ready(room_id, connection_id).await else {
            tracing::debug!(
                "Ignoring ready from '{}' for unknown room or player '{}'",
                connection_id,
                room_id
            );
            return false;
        };
        tracing::info!("'{}' is ready in room '{}'", outcome.nickname, room_id);

        broadcast_or_warn(
            self.message_pusher.as_ref(),
            &outcome.members,
            ServerEvent::PlayerReady {
                nickname: outcome.nickname,
            },
        )
        .await;

        outcome.should_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{
        RecordingPusher, Sent, conn, create_test_repository, nick, room_id,
    };

    #[tokio::test]
    async fn test_ready_is_broadcast_and_start_requested_when_both_ready() {
        // テスト項目: 2 人目の準備完了で対局開始の予約が要求される
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = MarkReadyUseCase::new(repository.clone(), pusher.clone());
        let r1 = room_id("r1");
        repository.join(&r1, conn("c1"), nick("Alice")).await.unwrap();
        repository.join(&r1, conn("c2"), nick("Bob")).await.unwrap();

        // when (操作):
        let first = usecase.execute(&conn("c1"), &r1).await;
        let second = usecase.execute(&conn("c2"), &r1).await;

        // then (期待する結果):
        assert!(!first);
        assert!(second);
        let sent = pusher.take().await;
        assert_eq!(
            sent[0],
            (
                Sent::Broadcast(vec![conn("c1"), conn("c2")]),
                ServerEvent::PlayerReady {
                    nickname: nick("Alice")
                }
            )
        );
        assert_eq!(sent.len(), 2);
    }

    #[tokio::test]
    async fn test_lone_ready_player_does_not_request_start() {
        // テスト項目: 1 人しかいない Room では準備完了しても開始しない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = MarkReadyUseCase::new(repository.clone(), pusher.clone());
        let r1 = room_id("r1");
        repository.join(&r1, conn("c1"), nick("Alice")).await.unwrap();

        // when (操作):
        let should_start = usecase.execute(&conn("c1"), &r1).await;

        // then (期待する結果):
        assert!(!should_start);
        assert_eq!(pusher.take_names().await, vec!["playerReady"]);
    }

    #[tokio::test]
    async fn test_ready_for_unknown_room_is_ignored() {
        // テスト項目: 存在しない Room への準備完了は黙って無視される
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = MarkReadyUseCase::new(repository, pusher.clone());

        // when (操作):
        let should_start = usecase.execute(&conn("c1"), &room_id("nowhere")).await;

        // then (期待する結果):
        assert!(!should_start);
        assert!(pusher.take().await.is_empty());
    }
}
