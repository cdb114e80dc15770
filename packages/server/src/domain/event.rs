//! クライアントとの間でやり取りするイベントのドメイン表現
//!
//! ワイヤ形式（JSON）への変換は Infrastructure 層の DTO が担当する。

use super::{
    board::Board,
    entity::{ChatEntry, HistoryEntry},
    value_object::{CellIndex, Nickname, RoomId, Symbol},
};

/// クライアントからの意図（inbound）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIntent {
    JoinRoom { room: RoomId, nickname: Nickname },
    Ready { room: RoomId },
    MakeMove {
        room: RoomId,
        symbol: Symbol,
        index: CellIndex,
    },
    ResetGame { room: RoomId },
    LeaveRoom { room: RoomId },
    /// 本文の検証は Registry が行う（空のメッセージは黙って捨てる）
    SendMessage { room: RoomId, text: String },
    /// Room が指定されていなければ空の履歴を返す
    RequestGameHistory { room: Option<RoomId> },
}

impl ClientIntent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientIntent::JoinRoom { .. } => "joinRoom",
            ClientIntent::Ready { .. } => "ready",
            ClientIntent::MakeMove { .. } => "makeMove",
            ClientIntent::ResetGame { .. } => "resetGame",
            ClientIntent::LeaveRoom { .. } => "leaveRoom",
            ClientIntent::SendMessage { .. } => "sendMessage",
            ClientIntent::RequestGameHistory { .. } => "requestGameHistory",
        }
    }
}

/// 終局の通知内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Win {
        winner: Nickname,
        symbol: Symbol,
        combination: [usize; 3],
        last_move: CellIndex,
    },
    Draw {
        last_move: CellIndex,
    },
}

/// サーバーからの通知（outbound）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// 参加者本人にだけ送る
    RoleAssigned {
        symbol: Symbol,
        current_turn: Symbol,
        opponent: Option<Nickname>,
    },
    GameWaiting {
        message: String,
    },
    GameStart {
        board: Board,
        current_turn: Symbol,
    },
    UpdateGame {
        board: Board,
        current_turn: Symbol,
        last_move: CellIndex,
    },
    GameOver(MatchResult),
    PlayerConnected {
        nickname: Nickname,
        symbol: Symbol,
        players: Vec<Nickname>,
    },
    PlayerLeft {
        nickname: Nickname,
    },
    /// プレイヤーのチャット
    Chat(ChatEntry),
    /// サーバーからのお知らせ（参加・退出など）。チャットログには残さない
    SystemNotice {
        message: String,
    },
    GameReset {
        board: Board,
        current_turn: Symbol,
    },
    HistoryUpdate(Vec<HistoryEntry>),
    PlayerReady {
        nickname: Nickname,
    },
    /// 送信元のコネクションにだけ送る
    GameError {
        message: String,
    },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::RoleAssigned { .. } => "roleAssigned",
            ServerEvent::GameWaiting { .. } => "gameWaiting",
            ServerEvent::GameStart { .. } => "gameStart",
            ServerEvent::UpdateGame { .. } => "updateGame",
            ServerEvent::GameOver(_) => "gameOver",
            ServerEvent::PlayerConnected { .. } => "playerConnected",
            ServerEvent::PlayerLeft { .. } => "playerLeft",
            ServerEvent::Chat(_) | ServerEvent::SystemNotice { .. } => "newMessage",
            ServerEvent::GameReset { .. } => "gameReset",
            ServerEvent::HistoryUpdate(_) => "gameHistoryUpdate",
            ServerEvent::PlayerReady { .. } => "playerReady",
            ServerEvent::GameError { .. } => "gameError",
        }
    }
}
