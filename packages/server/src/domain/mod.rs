//! Domain layer
//!
//! 値オブジェクト、エンティティ、盤面、Room のフェーズ、Session Registry と、
//! 外部に対するインターフェース（Repository / MessagePusher）を定義する。

pub mod board;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod phase;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use board::{Board, BoardState, WINNING_LINES};
pub use entity::{ChatEntry, HistoryEntry, MAX_PLAYERS, MoveOutcome, Player, Room};
pub use error::{GameError, MessagePushError, ValueObjectError};
pub use event::{ClientIntent, MatchResult, ServerEvent};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use phase::RoomPhase;
pub use registry::{
    BoardSnapshot, ChatPosted, DEFAULT_CHAT_LOG_LIMIT, DEFAULT_HISTORY_LIMIT, Departure,
    JoinOutcome, MoveResult, ReadyOutcome, SessionRegistry,
};
pub use repository::SessionRepository;
pub use value_object::{
    CELL_COUNT, CellIndex, ConnectionId, MessageContent, Nickname, RoomId, Symbol, Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
