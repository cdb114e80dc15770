//! WebSocket message DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": <payload>}`.
//! Field names follow the browser client (camelCase).

use serde::{Deserialize, Serialize};

// ========================================
// Client → Server
// ========================================

/// Inbound frame sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinRoom(JoinRoomPayload),
    Ready(RoomPayload),
    MakeMove(MakeMovePayload),
    ResetGame(RoomPayload),
    LeaveRoom(RoomPayload),
    SendMessage(SendMessagePayload),
    RequestGameHistory(RoomPayload),
}

/// Missing fields decode as empty strings so that the server can answer
/// with a `gameError` instead of dropping the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPayload {
    #[serde(default)]
    pub room: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeMovePayload {
    /// Symbol of the moving player ("X" / "O")
    pub player: String,
    pub index: i64,
    pub room: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    pub message: String,
    /// Ignored by the server, the member's nickname is used instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    pub room: String,
}

// ========================================
// Server → Client
// ========================================

/// Outbound frame sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    RoleAssigned(RoleAssignedPayload),
    GameWaiting(GameWaitingPayload),
    GameStart(BoardPayload),
    UpdateGame(UpdateGamePayload),
    GameOver(GameOverPayload),
    PlayerConnected(PlayerConnectedPayload),
    /// Nickname of the departed player
    PlayerLeft(String),
    NewMessage(NewMessagePayload),
    GameReset(BoardPayload),
    GameHistoryUpdate(Vec<HistoryEntryDto>),
    PlayerReady(PlayerReadyPayload),
    /// Human readable error text
    GameError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignedPayload {
    pub symbol: String,
    pub current_player: String,
    pub opponent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWaitingPayload {
    pub message: String,
}

/// Board cells: `""` for empty, `"X"` / `"O"` otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPayload {
    pub board: Vec<String>,
    pub current_player: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGamePayload {
    pub board: Vec<String>,
    pub current_player: String,
    pub last_move_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameOverPayload {
    #[serde(rename_all = "camelCase")]
    Win {
        winner: String,
        symbol: String,
        winning_combination: [usize; 3],
        last_move_index: usize,
    },
    #[serde(rename_all = "camelCase")]
    Draw { draw: bool, last_move_index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConnectedPayload {
    pub nickname: String,
    pub symbol: String,
    pub players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessagePayload {
    pub sender: String,
    pub message: String,
    /// Unix milliseconds, absent on system notices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerReadyPayload {
    pub nickname: String,
}

/// One concluded match; `timestamp` is RFC 3339
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntryDto {
    #[serde(rename_all = "camelCase")]
    Win {
        winner: String,
        symbol: String,
        winning_combination: [usize; 3],
        timestamp: String,
        board: Vec<String>,
    },
    Draw {
        draw: bool,
        timestamp: String,
        board: Vec<String>,
    },
}
