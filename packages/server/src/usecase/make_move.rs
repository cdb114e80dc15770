//! UseCase: 着手処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - MakeMoveUseCase::execute() メソッド
//! - 着手後の updateGame、終局時の gameOver と履歴の記録・配信
//!
//! ### なぜこのテストが必要か
//! - 終局時は 1 回の着手で 3 種類のイベントが決まった順に出る
//! - 履歴は終局 1 回につきちょうど 1 件だけ記録されなければならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：続行、勝ち、引き分け
//! - 異常系：手番違い（何も送信しない、状態は変わらない）

use std::sync::Arc;

use sanmoku_shared::time::Clock;

use crate::domain::{
    CellIndex, GameError, MatchResult, MessagePusher, MoveOutcome, RoomId, ServerEvent,
    SessionRepository, Symbol, Timestamp,
};

use super::broadcast_or_warn;

/// 着手のユースケース
pub struct MakeMoveUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 履歴のタイムスタンプ用
    clock: Arc<dyn Clock>,
}

impl MakeMoveUseCase {
    /// 新しい MakeMoveUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 着手を実行
    ///
    /// 送信順（すべて Room 全員宛て）:
    /// 1. `updateGame`
    /// 2. 終局なら `gameOver`、履歴を記録して `gameHistoryUpdate`
    ///
    /// # Errors
    ///
    /// Registry が返す `GameError`。このとき盤面・手番は変わらず、何も送信しない。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        symbol: Symbol,
        index: CellIndex,
    ) -> Result<MoveOutcome, GameError> {
        let result = self.repository.apply_move(room_id, symbol, index).await?;
        tracing::debug!(
            "{} played cell {} in room '{}'",
            symbol,
            index.value(),
            room_id
        );

        let pusher = self.message_pusher.as_ref();
        broadcast_or_warn(
            pusher,
            &result.members,
            ServerEvent::UpdateGame {
                board: result.board,
                current_turn: result.current_turn,
                last_move: result.index,
            },
        )
        .await;

        let match_result = match &result.outcome {
            MoveOutcome::Continue => return Ok(MoveOutcome::Continue),
            MoveOutcome::Win {
                winner,
                symbol,
                combination,
            } => {
                tracing::info!("'{}' won in room '{}'", winner, room_id);
                MatchResult::Win {
                    winner: winner.clone(),
                    symbol: *symbol,
                    combination: *combination,
                    last_move: result.index,
                }
            }
            MoveOutcome::Draw => {
                tracing::info!("Match in room '{}' ended in a draw", room_id);
                MatchResult::Draw {
                    last_move: result.index,
                }
            }
        };
        broadcast_or_warn(pusher, &result.members, ServerEvent::GameOver(match_result)).await;

        let now = Timestamp::new(self.clock.now_millis());
        if let Some(entry) = result.outcome.to_history_entry(result.board, now) {
            let history = self.repository.record_history(room_id, entry).await;
            broadcast_or_warn(pusher, &result.members, ServerEvent::HistoryUpdate(history)).await;
        }

        Ok(result.outcome)
    }
}
