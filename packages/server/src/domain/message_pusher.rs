//! MessagePusher trait 定義
//!
//! クライアントへの通知のインターフェース。具体的な実装（WebSocket）は Infrastructure 層が提供する。
//! 「1 コネクションへの送信」と「Room 全員への送信」の 2 つの宛先だけを扱う。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ServerEvent};

/// クライアントへの送信チャンネル（エンコード済みのフレームを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ通知 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// コネクションを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// コネクションの登録を解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 1 つのコネクションに送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のコネクションに送信（一部の失敗は許容する）
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
