//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! Session Registry をそのままインメモリ DB として使用します。
//!
//! 各メソッドはロックを 1 回だけ取り、Registry の 1 操作を実行して結果を複製して返す。
//! ロックを保持したまま I/O を待つことはない。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BoardSnapshot, CellIndex, ChatPosted, ConnectionId, Departure, GameError, HistoryEntry,
    JoinOutcome, MoveResult, Nickname, ReadyOutcome, Room, RoomId, SessionRegistry,
    SessionRepository, Symbol, Timestamp,
};

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    /// Session Registry
    registry: Arc<Mutex<SessionRegistry>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(registry: Arc<Mutex<SessionRegistry>>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn join(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        nickname: Nickname,
    ) -> Result<JoinOutcome, GameError> {
        let mut registry = self.registry.lock().await;
        registry.join(room_id, connection_id, nickname)
    }

    async fn mark_ready(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<ReadyOutcome> {
        let mut registry = self.registry.lock().await;
        registry.mark_ready(room_id, connection_id)
    }

    async fn startable_match(&self, room_id: &RoomId) -> Option<BoardSnapshot> {
        let registry = self.registry.lock().await;
        registry.startable_match(room_id)
    }

    async fn apply_move(
        &self,
        room_id: &RoomId,
        symbol: Symbol,
        index: CellIndex,
    ) -> Result<MoveResult, GameError> {
        let mut registry = self.registry.lock().await;
        registry.apply_move(room_id, symbol, index)
    }

    async fn reset_room(&self, room_id: &RoomId) -> Option<BoardSnapshot> {
        let mut registry = self.registry.lock().await;
        registry.reset_room(room_id)
    }

    async fn remove_player(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<Departure> {
        let mut registry = self.registry.lock().await;
        let departure = registry.remove_player(room_id, connection_id);
        if let Some(departure) = &departure
            && departure.room_destroyed
        {
            tracing::info!("Room '{}' is empty and has been destroyed", room_id);
        }
        departure
    }

    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let registry = self.registry.lock().await;
        registry.rooms_of(connection_id)
    }

    async fn append_chat(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        text: &str,
        now: Timestamp,
    ) -> Result<ChatPosted, GameError> {
        let mut registry = self.registry.lock().await;
        registry.append_chat(room_id, connection_id, text, now)
    }

    async fn record_history(&self, room_id: &RoomId, entry: HistoryEntry) -> Vec<HistoryEntry> {
        let mut registry = self.registry.lock().await;
        registry.record_history(room_id, entry)
    }

    async fn history(&self, room_id: &RoomId) -> Vec<HistoryEntry> {
        let registry = self.registry.lock().await;
        registry.history(room_id)
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let registry = self.registry.lock().await;
        registry.room(room_id).cloned()
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let registry = self.registry.lock().await;
        registry.rooms().into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Board, RoomPhase};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemorySessionRepository が Registry の操作をそのまま反映すること
    // - 返されるスナップショットが Registry の状態と一致すること
    //
    // 【なぜこのテストが必要か】
    // - UseCase は Repository 経由でしか状態に触れない
    // - HTTP API はスナップショットを読むだけなので、複製の正しさを担保する
    // ========================================

    fn create_test_repository() -> InMemorySessionRepository {
        let registry = Arc::new(Mutex::new(SessionRegistry::default()));
        InMemorySessionRepository::new(registry)
    }

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    fn nick(value: &str) -> Nickname {
        Nickname::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_is_visible_in_snapshot() {
        // テスト項目: 参加すると Room のスナップショットに反映される
        // given (前提条件):
        let repo = create_test_repository();
        let r1 = room_id("r1");

        // when (操作):
        let outcome = repo
            .join(&r1, ConnectionId::from_raw("c1"), nick("Alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome.symbol, Symbol::X);
        let room = repo.get_room(&r1).await.unwrap();
        assert_eq!(room.nicknames(), vec![nick("Alice")]);
        assert_eq!(room.phase(), RoomPhase::Waiting);
        assert_eq!(repo.get_rooms().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_last_player_destroys_room() {
        // テスト項目: 最後のプレイヤーが抜けると Room が一覧から消える
        // given (前提条件):
        let repo = create_test_repository();
        let r1 = room_id("r1");
        let c1 = ConnectionId::from_raw("c1");
        repo.join(&r1, c1.clone(), nick("Alice")).await.unwrap();

        // when (操作):
        let departure = repo.remove_player(&r1, &c1).await.unwrap();

        // then (期待する結果):
        assert!(departure.room_destroyed);
        assert!(repo.get_room(&r1).await.is_none());
        assert!(repo.get_rooms().await.is_empty());
        assert!(repo.rooms_of(&c1).await.is_empty());
    }

    #[tokio::test]
    async fn test_record_and_read_history() {
        // テスト項目: 記録した履歴を取得できる
        // given (前提条件):
        let repo = create_test_repository();
        let r1 = room_id("r1");
        let entry = HistoryEntry::Draw {
            board: Board::empty(),
            timestamp: Timestamp::new(1),
        };

        // when (操作):
        let updated = repo.record_history(&r1, entry.clone()).await;

        // then (期待する結果):
        assert_eq!(updated, vec![entry.clone()]);
        assert_eq!(repo.history(&r1).await, vec![entry]);
    }

    #[tokio::test]
    async fn test_shared_registry_is_observed() {
        // テスト項目: 同じ Registry を共有する Repository 同士で状態が見える
        // given (前提条件):
        let registry = Arc::new(Mutex::new(SessionRegistry::default()));
        let writer = InMemorySessionRepository::new(registry.clone());
        let reader = InMemorySessionRepository::new(registry);
        let r1 = room_id("r1");

        // when (操作):
        writer
            .join(&r1, ConnectionId::from_raw("c1"), nick("Alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(reader.get_room(&r1).await.is_some());
    }
}
