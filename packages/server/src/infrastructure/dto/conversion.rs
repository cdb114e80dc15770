//! Conversion logic between DTOs and domain types.

use thiserror::Error;

use sanmoku_shared::time::millis_to_jst_rfc3339;

use crate::domain::{
    Board, CellIndex, ClientIntent, GameError, HistoryEntry, MatchResult, Nickname, Player, Room,
    RoomId, ServerEvent, Symbol, ValueObjectError,
};
use crate::infrastructure::dto::{http as http_dto, websocket as dto};

/// Sender name used for server generated chat lines
pub const SYSTEM_SENDER: &str = "System";

/// クライアントのフレームがドメインの値に変換できなかった
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid '{event}' event: {reason}")]
pub struct InvalidIntent {
    pub event: &'static str,
    pub reason: ValueObjectError,
}

impl InvalidIntent {
    /// 送信元に返すエラーメッセージ
    ///
    /// 参加と着手の不備だけを返し、それ以外は黙って捨てる。
    pub fn feedback(&self) -> Option<String> {
        match (self.event, &self.reason) {
            ("joinRoom", _) => Some("Missing room or nickname.".to_string()),
            ("makeMove", ValueObjectError::CellOutOfRange(_)) => {
                Some("Invalid cell.".to_string())
            }
            ("makeMove", ValueObjectError::UnknownSymbol(_)) => {
                Some(GameError::UnknownSymbol.to_string())
            }
            _ => None,
        }
    }
}

// ========================================
// DTO → Domain
// ========================================

fn room_id(event: &'static str, room: String) -> Result<RoomId, InvalidIntent> {
    RoomId::new(room).map_err(|reason| InvalidIntent { event, reason })
}

impl TryFrom<dto::ClientEvent> for ClientIntent {
    type Error = InvalidIntent;

    fn try_from(event: dto::ClientEvent) -> Result<Self, Self::Error> {
        let intent = match event {
            dto::ClientEvent::JoinRoom(p) => {
                let room = room_id("joinRoom", p.room)?;
                let nickname = Nickname::new(p.nickname).map_err(|reason| InvalidIntent {
                    event: "joinRoom",
                    reason,
                })?;
                ClientIntent::JoinRoom { room, nickname }
            }
            dto::ClientEvent::Ready(p) => ClientIntent::Ready {
                room: room_id("ready", p.room)?,
            },
            dto::ClientEvent::MakeMove(p) => {
                let room = room_id("makeMove", p.room)?;
                let invalid = |reason| InvalidIntent {
                    event: "makeMove",
                    reason,
                };
                let symbol = Symbol::try_from(p.player.as_str()).map_err(invalid)?;
                let index = CellIndex::new(p.index).map_err(invalid)?;
                ClientIntent::MakeMove {
                    room,
                    symbol,
                    index,
                }
            }
            dto::ClientEvent::ResetGame(p) => ClientIntent::ResetGame {
                room: room_id("resetGame", p.room)?,
            },
            dto::ClientEvent::LeaveRoom(p) => ClientIntent::LeaveRoom {
                room: room_id("leaveRoom", p.room)?,
            },
            dto::ClientEvent::SendMessage(p) => ClientIntent::SendMessage {
                room: room_id("sendMessage", p.room)?,
                text: p.message,
            },
            dto::ClientEvent::RequestGameHistory(p) => ClientIntent::RequestGameHistory {
                room: RoomId::new(p.room).ok(),
            },
        };
        Ok(intent)
    }
}

// ========================================
// Domain → DTO
// ========================================

/// 盤面を `""` / `"X"` / `"O"` の配列に変換
pub fn board_cells(board: &Board) -> Vec<String> {
    board
        .cells()
        .iter()
        .map(|cell| cell.map(Symbol::as_str).unwrap_or_default().to_string())
        .collect()
}

fn board_payload(board: &Board, current_turn: Symbol) -> dto::BoardPayload {
    dto::BoardPayload {
        board: board_cells(board),
        current_player: current_turn.as_str().to_string(),
    }
}

impl From<&HistoryEntry> for dto::HistoryEntryDto {
    fn from(entry: &HistoryEntry) -> Self {
        match entry {
            HistoryEntry::Win {
                winner,
                symbol,
                combination,
                board,
                timestamp,
            } => Self::Win {
                winner: winner.as_str().to_string(),
                symbol: symbol.as_str().to_string(),
                winning_combination: *combination,
                timestamp: millis_to_jst_rfc3339(timestamp.value()),
                board: board_cells(board),
            },
            HistoryEntry::Draw { board, timestamp } => Self::Draw {
                draw: true,
                timestamp: millis_to_jst_rfc3339(timestamp.value()),
                board: board_cells(board),
            },
        }
    }
}

impl From<&MatchResult> for dto::GameOverPayload {
    fn from(result: &MatchResult) -> Self {
        match result {
            MatchResult::Win {
                winner,
                symbol,
                combination,
                last_move,
            } => Self::Win {
                winner: winner.as_str().to_string(),
                symbol: symbol.as_str().to_string(),
                winning_combination: *combination,
                last_move_index: last_move.value(),
            },
            MatchResult::Draw { last_move } => Self::Draw {
                draw: true,
                last_move_index: last_move.value(),
            },
        }
    }
}

impl From<&ServerEvent> for dto::ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::RoleAssigned {
                symbol,
                current_turn,
                opponent,
            } => Self::RoleAssigned(dto::RoleAssignedPayload {
                symbol: symbol.as_str().to_string(),
                current_player: current_turn.as_str().to_string(),
                opponent: opponent.as_ref().map(|n| n.as_str().to_string()),
            }),
            ServerEvent::GameWaiting { message } => Self::GameWaiting(dto::GameWaitingPayload {
                message: message.clone(),
            }),
            ServerEvent::GameStart {
                board,
                current_turn,
            } => Self::GameStart(board_payload(board, *current_turn)),
            ServerEvent::UpdateGame {
                board,
                current_turn,
                last_move,
            } => Self::UpdateGame(dto::UpdateGamePayload {
                board: board_cells(board),
                current_player: current_turn.as_str().to_string(),
                last_move_index: last_move.value(),
            }),
            ServerEvent::GameOver(result) => Self::GameOver(result.into()),
            ServerEvent::PlayerConnected {
                nickname,
                symbol,
                players,
            } => Self::PlayerConnected(dto::PlayerConnectedPayload {
                nickname: nickname.as_str().to_string(),
                symbol: symbol.as_str().to_string(),
                players: players.iter().map(|n| n.as_str().to_string()).collect(),
            }),
            ServerEvent::PlayerLeft { nickname } => Self::PlayerLeft(nickname.as_str().to_string()),
            ServerEvent::Chat(entry) => Self::NewMessage(dto::NewMessagePayload {
                sender: entry.sender.as_str().to_string(),
                message: entry.content.as_str().to_string(),
                timestamp: Some(entry.timestamp.value()),
            }),
            ServerEvent::SystemNotice { message } => Self::NewMessage(dto::NewMessagePayload {
                sender: SYSTEM_SENDER.to_string(),
                message: message.clone(),
                timestamp: None,
            }),
            ServerEvent::GameReset {
                board,
                current_turn,
            } => Self::GameReset(board_payload(board, *current_turn)),
            ServerEvent::HistoryUpdate(entries) => {
                Self::GameHistoryUpdate(entries.iter().map(Into::into).collect())
            }
            ServerEvent::PlayerReady { nickname } => Self::PlayerReady(dto::PlayerReadyPayload {
                nickname: nickname.as_str().to_string(),
            }),
            ServerEvent::GameError { message } => Self::GameError(message.clone()),
        }
    }
}

impl From<&Room> for http_dto::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            players: room
                .players
                .iter()
                .map(|p| p.nickname.as_str().to_string())
                .collect(),
            phase: room.phase().as_str().to_string(),
        }
    }
}

impl From<&Player> for http_dto::PlayerDetailDto {
    fn from(player: &Player) -> Self {
        Self {
            nickname: player.nickname.as_str().to_string(),
            symbol: player.symbol.as_str().to_string(),
            is_ready: player.is_ready,
        }
    }
}

impl From<&Room> for http_dto::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            players: room.players.iter().map(Into::into).collect(),
            board: board_cells(&room.board),
            current_player: room.current_turn.as_str().to_string(),
            phase: room.phase().as_str().to_string(),
            is_over: room.is_over,
            chat_log_length: room.chat_log.len(),
        }
    }
}
