//! Room のフェーズ（状態機械）
//!
//! フェーズは Room のフィールドから [`RoomPhase::of`] だけで導出する。
//! 遷移の可否はすべてこの値で判定し、条件分岐を散らさない。
//!
//! ```text
//! Empty → Waiting → ReadyCheck → InProgress → Concluded
//!                       ↑                         │
//!                       └──────── reset ──────────┘
//! ```

use std::fmt;

/// Room のフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    /// プレイヤーがいない（Room は即座に破棄される）
    Empty,
    /// 1 人だけ参加している
    Waiting,
    /// 2 人揃ったが、両者の準備ができていない
    ReadyCheck,
    /// 両者が準備完了し、対局中
    InProgress,
    /// 勝敗または引き分けが確定した
    Concluded,
}

impl RoomPhase {
    /// Room のフィールドからフェーズを導出
    ///
    /// `Concluded` は人数より優先する（対局終了後に 1 人抜けても reset まで終了のまま）。
    pub fn of(player_count: usize, ready_count: usize, capacity: usize, is_over: bool) -> Self {
        if player_count == 0 {
            RoomPhase::Empty
        } else if is_over {
            RoomPhase::Concluded
        } else if player_count < capacity {
            RoomPhase::Waiting
        } else if ready_count == player_count {
            RoomPhase::InProgress
        } else {
            RoomPhase::ReadyCheck
        }
    }

    /// 着手を受け付けるフェーズか
    pub fn accepts_moves(self) -> bool {
        self == RoomPhase::InProgress
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoomPhase::Empty => "empty",
            RoomPhase::Waiting => "waiting",
            RoomPhase::ReadyCheck => "ready_check",
            RoomPhase::InProgress => "in_progress",
            RoomPhase::Concluded => "concluded",
        }
    }
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
