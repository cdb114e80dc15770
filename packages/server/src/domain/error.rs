//! Domain errors.

use thiserror::Error;

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("nickname must not be empty")]
    EmptyNickname,

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("cell index {0} is out of range (0-8)")]
    CellOutOfRange(i64),

    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),
}

/// セッションレジストリが返すゲームのエラー
///
/// どれもユーザーの再試行で回復できる種類のエラーで、プロセスを落とすことはない。
/// `Display` の文字列はそのまま `gameError` としてクライアントに送られる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("The room is full.")]
    RoomFull,

    #[error("Nickname already in use.")]
    DuplicateNickname,

    #[error("You already joined this room.")]
    AlreadyJoined,

    #[error("Room not found.")]
    RoomNotFound,

    #[error("You are not a member of this room.")]
    PlayerNotFound,

    #[error("The match is already over.")]
    GameOver,

    #[error("The match has not started yet.")]
    MatchNotStarted,

    #[error("No player holds that symbol.")]
    UnknownSymbol,

    #[error("It is not your turn.")]
    NotYourTurn,

    #[error("Cell already occupied.")]
    CellOccupied,

    #[error("Message is empty.")]
    EmptyMessage,
}

impl GameError {
    /// このエラーを送信元のコネクションに返すべきか
    ///
    /// 存在しない room / player を参照するイベントは古いクライアント状態によるもので、
    /// 送信元が取れる対処がないため黙って捨てる。
    pub fn is_reported_to_sender(&self) -> bool {
        !matches!(
            self,
            GameError::RoomNotFound | GameError::PlayerNotFound | GameError::EmptyMessage
        )
    }
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode message: {0}")]
    EncodeFailed(String),
}
