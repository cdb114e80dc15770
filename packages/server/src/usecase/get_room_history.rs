//! UseCase: Room の対局履歴取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{HistoryEntry, RoomId, SessionRepository};

/// 対局履歴取得のユースケース
pub struct GetRoomHistoryUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl GetRoomHistoryUseCase {
    /// 新しい GetRoomHistoryUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 履歴を古い順に返す。Room が破棄された後でも残っている
    pub async fn execute(&self, room_id: String) -> Vec<HistoryEntry> {
        match RoomId::new(room_id) {
            Ok(room_id) => self.repository.history(&room_id).await,
            Err(_) => Vec::new(),
        }
    }
}
