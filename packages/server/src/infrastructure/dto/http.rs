//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room list item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// Nicknames in join order
    pub players: Vec<String>,
    pub phase: String,
}

/// Player as shown in the room detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDetailDto {
    pub nickname: String,
    pub symbol: String,
    pub is_ready: bool,
}

/// Room detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub players: Vec<PlayerDetailDto>,
    pub board: Vec<String>,
    pub current_player: String,
    pub phase: String,
    pub is_over: bool,
    pub chat_log_length: usize,
}
