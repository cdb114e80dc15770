//! UseCase: Room 一覧取得

use std::sync::Arc;

use crate::domain::{Room, SessionRepository};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 現在存在する全 Room（id 順）
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }
}
