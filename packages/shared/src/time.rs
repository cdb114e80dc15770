//! 時刻の取得と表示
//!
//! 対局・チャットのタイムスタンプは Unix ミリ秒で保持し、
//! 履歴としてクライアントに渡すときだけ JST の RFC 3339 文字列にする。

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// UTC+9
const JST_OFFSET_SECONDS: i32 = 9 * 3600;

/// 現在時刻の取得元
pub trait Clock: Send + Sync {
    /// Unix ミリ秒
    fn now_millis(&self) -> i64;
}

/// OS の時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// 常に同じ時刻を返す時計（テスト用）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    millis: i64,
}

impl FixedClock {
    pub fn new(millis: i64) -> Self {
        Self { millis }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis
    }
}

/// 呼び出し側が進める時計（テスト用）
#[derive(Debug, Default)]
pub struct SteppingClock {
    millis: AtomicI64,
}

impl SteppingClock {
    pub fn starting_at(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    /// `delta` ミリ秒進める
    pub fn advance(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for SteppingClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Unix ミリ秒を JST の RFC 3339 文字列にする
///
/// 範囲外の値は Unix エポックとして表示する。
pub fn millis_to_jst_rfc3339(millis: i64) -> String {
    let utc = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
    match FixedOffset::east_opt(JST_OFFSET_SECONDS) {
        Some(jst) => utc
            .with_timezone(&jst)
            .to_rfc3339_opts(SecondsFormat::Millis, false),
        None => utc.to_rfc3339_opts(SecondsFormat::Millis, false),
    }
}
