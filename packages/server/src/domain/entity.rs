//! Entities

use std::collections::VecDeque;

use super::{
    board::Board,
    phase::RoomPhase,
    value_object::{ConnectionId, MessageContent, Nickname, RoomId, Symbol, Timestamp},
};

/// 1 つの Room に参加できる最大人数
pub const MAX_PLAYERS: usize = 2;

/// Room に参加しているプレイヤー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// 所有するトランスポート接続（参加のキー）
    pub connection_id: ConnectionId,
    /// 参加順で決まる記号。Room にいる間は変わらない
    pub symbol: Symbol,
    pub nickname: Nickname,
    /// reset のたびに false に戻る
    pub is_ready: bool,
}

impl Player {
    pub fn new(connection_id: ConnectionId, symbol: Symbol, nickname: Nickname) -> Self {
        Self {
            connection_id,
            symbol,
            nickname,
            is_ready: false,
        }
    }
}

/// チャットログの 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub sender: Nickname,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

/// 対局履歴の 1 件
///
/// Room とは独立して保持され、Room が破棄されても残る。作成後は変更しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    Win {
        winner: Nickname,
        symbol: Symbol,
        combination: [usize; 3],
        board: Board,
        timestamp: Timestamp,
    },
    Draw {
        board: Board,
        timestamp: Timestamp,
    },
}

impl HistoryEntry {
    pub fn board(&self) -> &Board {
        match self {
            HistoryEntry::Win { board, .. } | HistoryEntry::Draw { board, .. } => board,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            HistoryEntry::Win { timestamp, .. } | HistoryEntry::Draw { timestamp, .. } => {
                *timestamp
            }
        }
    }
}

/// 1 手を指した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// 対局続行（手番は相手に移った）
    Continue,
    Win {
        winner: Nickname,
        symbol: Symbol,
        combination: [usize; 3],
    },
    Draw,
}

impl MoveOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MoveOutcome::Continue)
    }

    /// 終局なら履歴エントリを作る
    pub fn to_history_entry(&self, board: Board, timestamp: Timestamp) -> Option<HistoryEntry> {
        match self {
            MoveOutcome::Continue => None,
            MoveOutcome::Win {
                winner,
                symbol,
                combination,
            } => Some(HistoryEntry::Win {
                winner: winner.clone(),
                symbol: *symbol,
                combination: *combination,
                board,
                timestamp,
            }),
            MoveOutcome::Draw => Some(HistoryEntry::Draw { board, timestamp }),
        }
    }
}

/// Room: 1 対局とチャットのコンテキスト
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    /// 参加順
    pub players: Vec<Player>,
    pub board: Board,
    pub current_turn: Symbol,
    pub is_over: bool,
    pub chat_log: VecDeque<ChatEntry>,
    chat_log_limit: usize,
}

impl Room {
    /// 空の盤面、`X` の手番で Room を作成
    pub fn new(id: RoomId, chat_log_limit: usize) -> Self {
        Self {
            id,
            players: Vec::with_capacity(MAX_PLAYERS),
            board: Board::empty(),
            current_turn: Symbol::X,
            is_over: false,
            chat_log: VecDeque::new(),
            chat_log_limit,
        }
    }

    pub fn phase(&self) -> RoomPhase {
        let ready_count = self.players.iter().filter(|p| p.is_ready).count();
        RoomPhase::of(self.players.len(), ready_count, MAX_PLAYERS, self.is_over)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn has_nickname(&self, nickname: &Nickname) -> bool {
        self.players
            .iter()
            .any(|p| p.nickname.eq_ignore_case(nickname))
    }

    /// まだ誰も持っていない最初の記号（`X` → `O` の順）
    pub fn next_symbol(&self) -> Option<Symbol> {
        Symbol::JOIN_ORDER
            .into_iter()
            .find(|symbol| self.player_by_symbol(*symbol).is_none())
    }

    pub fn player_by_connection(&self, connection_id: &ConnectionId) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| &p.connection_id == connection_id)
    }

    pub fn player_by_connection_mut(&mut self, connection_id: &ConnectionId) -> Option<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| &p.connection_id == connection_id)
    }

    pub fn player_by_symbol(&self, symbol: Symbol) -> Option<&Player> {
        self.players.iter().find(|p| p.symbol == symbol)
    }

    pub fn nicknames(&self) -> Vec<Nickname> {
        self.players.iter().map(|p| p.nickname.clone()).collect()
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.players.iter().map(|p| p.connection_id.clone()).collect()
    }

    /// 盤面・手番・終了フラグ・全員の準備状態を初期化
    pub fn reset_match(&mut self) {
        self.board = Board::empty();
        self.current_turn = Symbol::X;
        self.is_over = false;
        for player in &mut self.players {
            player.is_ready = false;
        }
    }

    /// チャットを追加し、上限を超えた分は古いものから捨てる
    pub fn push_chat(&mut self, entry: ChatEntry) {
        self.chat_log.push_back(entry);
        while self.chat_log.len() > self.chat_log_limit {
            self.chat_log.pop_front();
        }
    }
}
