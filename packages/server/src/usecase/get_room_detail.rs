//! UseCase: Room 詳細取得

use std::sync::Arc;

use crate::domain::{Room, RoomId, SessionRepository};

use super::error::GetRoomDetailError;

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Room の詳細を取得
    ///
    /// # Errors
    ///
    /// id が空、または Room が存在しなければ `RoomNotFound`
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.repository
            .get_room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
