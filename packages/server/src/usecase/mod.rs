//! UseCase layer
//!
//! クライアントのイベント 1 つ（と HTTP の読み取り 1 つ）に対応するユースケース群。
//! 各ユースケースは Repository で状態を検証・更新し、MessagePusher で結果を通知する。

mod connect_client;
mod disconnect_client;
mod error;
mod get_room_detail;
mod get_room_history;
mod get_rooms;
mod join_room;
mod leave_room;
mod make_move;
mod mark_ready;
mod report_error;
mod request_history;
mod reset_game;
mod send_chat;
mod start_match;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::GetRoomDetailError;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_room_history::GetRoomHistoryUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinRoomUseCase, WAITING_MESSAGE};
pub use leave_room::LeaveRoomUseCase;
pub use make_move::MakeMoveUseCase;
pub use mark_ready::MarkReadyUseCase;
pub use report_error::ReportErrorUseCase;
pub use request_history::RequestHistoryUseCase;
pub use reset_game::ResetGameUseCase;
pub use send_chat::SendChatUseCase;
pub use start_match::StartMatchUseCase;

use crate::domain::{ConnectionId, MessagePusher, ServerEvent};

/// 1 つのコネクションに送信する。失敗はログに残して処理を続ける
async fn push_or_warn(pusher: &dyn MessagePusher, target: &ConnectionId, event: ServerEvent) {
    if let Err(e) = pusher.push_to(target, &event).await {
        tracing::warn!("Failed to push '{}' to '{}': {}", event.name(), target, e);
    }
}

/// Room のメンバーに送信する。失敗はログに残して処理を続ける
async fn broadcast_or_warn(pusher: &dyn MessagePusher, targets: &[ConnectionId], event: ServerEvent) {
    if targets.is_empty() {
        return;
    }
    if let Err(e) = pusher.broadcast(targets, &event).await {
        tracing::warn!("Failed to broadcast '{}': {}", event.name(), e);
    }
}
