//! Session Registry
//!
//! RoomId → Room と RoomId → 対局履歴 の 2 つのマップを持つ、インメモリの状態。
//! I/O は一切行わず、すべての操作は同期的に完了する。
//!
//! 不変条件:
//!
//! - Room のプレイヤーは最大 2 人
//! - Room 内のニックネームは大文字小文字を区別せずに一意
//! - `current_turn` は終局していない手のあとで必ず交代する
//! - `is_over` は reset 以外で false に戻らない
//! - プレイヤーが 0 人になった Room は即座に破棄されるが、履歴は残る

use std::collections::{HashMap, VecDeque};

use super::{
    board::{Board, BoardState},
    entity::{ChatEntry, HistoryEntry, MoveOutcome, Player, Room},
    error::GameError,
    phase::RoomPhase,
    value_object::{CellIndex, ConnectionId, MessageContent, Nickname, RoomId, Symbol, Timestamp},
};

/// Room ごとに保持する履歴の件数
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Room ごとに保持するチャットの件数
pub const DEFAULT_CHAT_LOG_LIMIT: usize = 100;

/// 参加成功時の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub symbol: Symbol,
    pub current_turn: Symbol,
    pub opponent: Option<Nickname>,
    /// 参加順のニックネーム一覧
    pub roster: Vec<Nickname>,
    pub members: Vec<ConnectionId>,
}

impl JoinOutcome {
    pub fn is_room_full(&self) -> bool {
        self.roster.len() >= super::entity::MAX_PLAYERS
    }
}

/// 準備完了の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyOutcome {
    pub nickname: Nickname,
    /// 全員が準備完了かつ対局が終わっていない（= 対局開始を予約すべき）
    pub should_start: bool,
    pub members: Vec<ConnectionId>,
}

/// 着手の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub board: Board,
    /// 続行なら相手の記号、終局なら最後に指した記号のまま
    pub current_turn: Symbol,
    pub outcome: MoveOutcome,
    pub index: CellIndex,
    pub members: Vec<ConnectionId>,
}

/// 盤面と手番のスナップショット（対局開始・reset の通知用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub board: Board,
    pub current_turn: Symbol,
    pub members: Vec<ConnectionId>,
}

/// 退出の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    pub nickname: Nickname,
    pub room_destroyed: bool,
    /// 残っているメンバー
    pub members: Vec<ConnectionId>,
}

/// チャット投稿の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPosted {
    pub entry: ChatEntry,
    pub members: Vec<ConnectionId>,
}

/// 上限付きの対局履歴（古いものから捨てる）
#[derive(Debug, Clone, Default)]
struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    fn push(&mut self, entry: HistoryEntry, limit: usize) {
        self.entries.push_back(entry);
        while self.entries.len() > limit {
            self.entries.pop_front();
        }
    }

    fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Session Registry
#[derive(Debug)]
pub struct SessionRegistry {
    rooms: HashMap<RoomId, Room>,
    histories: HashMap<RoomId, HistoryLog>,
    history_limit: usize,
    chat_log_limit: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT, DEFAULT_CHAT_LOG_LIMIT)
    }
}

impl SessionRegistry {
    pub fn new(history_limit: usize, chat_log_limit: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            histories: HashMap::new(),
            history_limit,
            chat_log_limit,
        }
    }

    /// 既存の Room を返す。なければ空の Room を作る
    pub fn create_or_get_room(&mut self, room_id: &RoomId) -> &mut Room {
        let chat_log_limit = self.chat_log_limit;
        self.rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), chat_log_limit))
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// 全 Room（RoomId 順）
    pub fn rooms(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    /// Room に参加しているコネクション
    pub fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(Room::connection_ids)
            .unwrap_or_default()
    }

    /// コネクションが参加している Room
    pub fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let mut room_ids: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.player_by_connection(connection_id).is_some())
            .map(|room| room.id.clone())
            .collect();
        room_ids.sort();
        room_ids
    }

    /// Room に参加する
    ///
    /// 失敗した場合は何も変更しない（参加できない Room を新しく作ることもない）。
    pub fn join(
        &mut self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        nickname: Nickname,
    ) -> Result<JoinOutcome, GameError> {
        if let Some(room) = self.rooms.get(room_id) {
            if room.player_by_connection(&connection_id).is_some() {
                return Err(GameError::AlreadyJoined);
            }
            if room.is_full() {
                return Err(GameError::RoomFull);
            }
            if room.has_nickname(&nickname) {
                return Err(GameError::DuplicateNickname);
            }
        }

        let room = self.create_or_get_room(room_id);
        let symbol = room.next_symbol().ok_or(GameError::RoomFull)?;
        let opponent = room.players.first().map(|p| p.nickname.clone());
        room.players.push(Player::new(connection_id, symbol, nickname));

        Ok(JoinOutcome {
            symbol,
            current_turn: room.current_turn,
            opponent,
            roster: room.nicknames(),
            members: room.connection_ids(),
        })
    }

    /// 準備完了にする。Room かプレイヤーが見つからなければ何もしない
    pub fn mark_ready(
        &mut self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<ReadyOutcome> {
        let room = self.rooms.get_mut(room_id)?;
        let phase_before = room.phase();
        let player = room.player_by_connection_mut(connection_id)?;
        player.is_ready = true;
        let nickname = player.nickname.clone();

        Some(ReadyOutcome {
            nickname,
            // 対局中の再送では開始を予約し直さない
            should_start: phase_before == RoomPhase::ReadyCheck
                && room.phase() == RoomPhase::InProgress,
            members: room.connection_ids(),
        })
    }

    /// 遅延後の対局開始時点で、まだ対局中であれば盤面を返す
    pub fn startable_match(&self, room_id: &RoomId) -> Option<BoardSnapshot> {
        let room = self.rooms.get(room_id)?;
        if room.phase() != RoomPhase::InProgress {
            return None;
        }
        Some(BoardSnapshot {
            board: room.board,
            current_turn: room.current_turn,
            members: room.connection_ids(),
        })
    }

    /// 着手する
    ///
    /// 失敗した場合、盤面と手番は変わらない。
    pub fn apply_move(
        &mut self,
        room_id: &RoomId,
        symbol: Symbol,
        index: CellIndex,
    ) -> Result<MoveResult, GameError> {
        let room = self.rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;

        match room.phase() {
            RoomPhase::InProgress => {}
            RoomPhase::Concluded => return Err(GameError::GameOver),
            _ => return Err(GameError::MatchNotStarted),
        }
        let mover = room
            .player_by_symbol(symbol)
            .map(|p| p.nickname.clone())
            .ok_or(GameError::UnknownSymbol)?;
        if symbol != room.current_turn {
            return Err(GameError::NotYourTurn);
        }
        if !room.board.place(index, symbol) {
            return Err(GameError::CellOccupied);
        }

        let outcome = match room.board.evaluate() {
            BoardState::Won { symbol, line } => MoveOutcome::Win {
                winner: mover,
                symbol,
                combination: line,
            },
            BoardState::Draw => MoveOutcome::Draw,
            BoardState::Open => MoveOutcome::Continue,
        };
        if outcome.is_terminal() {
            room.is_over = true;
        } else {
            room.current_turn = room.current_turn.other();
        }

        Ok(MoveResult {
            board: room.board,
            current_turn: room.current_turn,
            outcome,
            index,
            members: room.connection_ids(),
        })
    }

    /// 盤面・手番・終了フラグ・準備状態を初期化する。Room がなければ何もしない
    pub fn reset_room(&mut self, room_id: &RoomId) -> Option<BoardSnapshot> {
        let room = self.rooms.get_mut(room_id)?;
        room.reset_match();
        Some(BoardSnapshot {
            board: room.board,
            current_turn: room.current_turn,
            members: room.connection_ids(),
        })
    }

    /// プレイヤーを退出させる。最後の 1 人なら Room を破棄する（履歴は残す）
    pub fn remove_player(
        &mut self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<Departure> {
        let room = self.rooms.get_mut(room_id)?;
        let position = room
            .players
            .iter()
            .position(|p| &p.connection_id == connection_id)?;
        let removed = room.players.remove(position);
        let members = room.connection_ids();

        let room_destroyed = room.is_empty();
        if room_destroyed {
            self.rooms.remove(room_id);
        }

        Some(Departure {
            room_id: room_id.clone(),
            nickname: removed.nickname,
            room_destroyed,
            members,
        })
    }

    /// チャットを追加する
    pub fn append_chat(
        &mut self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        text: &str,
        now: Timestamp,
    ) -> Result<ChatPosted, GameError> {
        let room = self.rooms.get_mut(room_id).ok_or(GameError::RoomNotFound)?;
        let sender = room
            .player_by_connection(connection_id)
            .map(|p| p.nickname.clone())
            .ok_or(GameError::PlayerNotFound)?;
        let content = MessageContent::new(text).map_err(|_| GameError::EmptyMessage)?;

        let entry = ChatEntry {
            sender,
            content,
            timestamp: now,
        };
        room.push_chat(entry.clone());

        Ok(ChatPosted {
            entry,
            members: room.connection_ids(),
        })
    }

    /// 履歴を追加し、上限を超えた古いものを捨てる。更新後の履歴を返す
    pub fn record_history(&mut self, room_id: &RoomId, entry: HistoryEntry) -> Vec<HistoryEntry> {
        let limit = self.history_limit;
        let log = self.histories.entry(room_id.clone()).or_default();
        log.push(entry, limit);
        log.to_vec()
    }

    /// Room の履歴（古い順）。まだなければ空
    pub fn history(&self, room_id: &RoomId) -> Vec<HistoryEntry> {
        self.histories
            .get(room_id)
            .map(HistoryLog::to_vec)
            .unwrap_or_default()
    }
}
