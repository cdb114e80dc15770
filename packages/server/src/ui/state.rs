//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{GetRoomDetailUseCase, GetRoomHistoryUseCase, GetRoomsUseCase};

use super::event_loop::CommandSender;

/// Shared application state
pub struct AppState {
    /// イベントループへの送信口（WebSocket から届いたイベントはここに流す）
    pub commands: CommandSender,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetRoomHistoryUseCase（対局履歴取得のユースケース）
    pub get_room_history_usecase: Arc<GetRoomHistoryUseCase>,
}
