//! Value Objects
//!
//! 生成時にバリデーションを行い、不正な値を持つインスタンスが存在しないことを保証する。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// 盤面のセル数（3×3）
pub const CELL_COUNT: usize = 9;

/// Room の識別子（作成者が自由に決める文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// 空白だけでなければ、受け取った文字列のまま RoomId を作成
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// トランスポート接続の識別子
///
/// WebSocket 接続ごとにサーバー側で採番する。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// UUID v4 で新しい ConnectionId を採番
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// 既存の文字列から ConnectionId を作成（テストや再接続用）
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// プレイヤーの表示名
///
/// 大文字小文字は保持するが、Room 内の一意性は大文字小文字を区別せずに判定する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nickname(String);

impl Nickname {
    /// 空白だけでなければ、受け取った文字列のまま Nickname を作成
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyNickname);
        }
        Ok(Self(value))
    }

    /// 大文字小文字を区別せずに比較
    pub fn eq_ignore_case(&self, other: &Nickname) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Nickname {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// チャットメッセージ本文（前後の空白を除去済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: &str) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyMessage);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 手番の記号。先に参加したプレイヤーが `X`、後から参加したプレイヤーが `O`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// 参加順に割り当てる記号の順序
    pub const JOIN_ORDER: [Symbol; 2] = [Symbol::X, Symbol::O];

    /// 相手の記号
    pub fn other(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::X => "X",
            Symbol::O => "O",
        }
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "X" => Ok(Symbol::X),
            "O" => Ok(Symbol::O),
            other => Err(ValueObjectError::UnknownSymbol(other.to_string())),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 盤面のセル番号（0-8、左上から行優先）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex(usize);

impl CellIndex {
    pub fn new(value: i64) -> Result<Self, ValueObjectError> {
        match usize::try_from(value) {
            Ok(index) if index < CELL_COUNT => Ok(Self(index)),
            _ => Err(ValueObjectError::CellOutOfRange(value)),
        }
    }

    pub fn value(self) -> usize {
        self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}
