//! Game server configuration.

use std::time::Duration;

use crate::domain::{DEFAULT_CHAT_LOG_LIMIT, DEFAULT_HISTORY_LIMIT};

/// 2 人が準備完了してから `gameStart` を送るまでの既定の待ち時間
pub const DEFAULT_START_DELAY: Duration = Duration::from_secs(1);

/// ゲームサーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// 準備完了から対局開始までの待ち時間
    pub start_delay: Duration,
    /// Room ごとに保持する対局履歴の件数
    pub history_limit: usize,
    /// Room ごとに保持するチャットの件数
    pub chat_log_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_delay: DEFAULT_START_DELAY,
            history_limit: DEFAULT_HISTORY_LIMIT,
            chat_log_limit: DEFAULT_CHAT_LOG_LIMIT,
        }
    }
}
