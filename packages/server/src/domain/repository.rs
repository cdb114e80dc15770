//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは Session Registry の 1 操作に対応し、1 回の呼び出しの中で完結する。

use async_trait::async_trait;

use super::{
    BoardSnapshot, CellIndex, ChatPosted, ConnectionId, Departure, GameError, HistoryEntry,
    JoinOutcome, MoveResult, Nickname, ReadyOutcome, Room, RoomId, Symbol, Timestamp,
};

/// Session Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Room に参加
    async fn join(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        nickname: Nickname,
    ) -> Result<JoinOutcome, GameError>;

    /// 準備完了（Room / プレイヤーが見つからなければ None）
    async fn mark_ready(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<ReadyOutcome>;

    /// まだ対局を始められる状態なら盤面を返す
    async fn startable_match(&self, room_id: &RoomId) -> Option<BoardSnapshot>;

    /// 着手
    async fn apply_move(
        &self,
        room_id: &RoomId,
        symbol: Symbol,
        index: CellIndex,
    ) -> Result<MoveResult, GameError>;

    /// 盤面を初期化（Room がなければ None）
    async fn reset_room(&self, room_id: &RoomId) -> Option<BoardSnapshot>;

    /// プレイヤーを退出させる
    async fn remove_player(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<Departure>;

    /// コネクションが参加している全 Room
    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId>;

    /// チャットを追加
    async fn append_chat(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        text: &str,
        now: Timestamp,
    ) -> Result<ChatPosted, GameError>;

    /// 履歴を追加し、更新後の履歴を返す
    async fn record_history(&self, room_id: &RoomId, entry: HistoryEntry) -> Vec<HistoryEntry>;

    /// 履歴を取得
    async fn history(&self, room_id: &RoomId) -> Vec<HistoryEntry>;

    /// Room のスナップショットを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全 Room のスナップショットを取得
    async fn get_rooms(&self) -> Vec<Room>;
}
