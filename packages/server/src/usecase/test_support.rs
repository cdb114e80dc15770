//! UseCase テスト用のヘルパー

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, MessagePushError, MessagePusher, Nickname, PusherChannel, RoomId,
        ServerEvent, SessionRegistry,
    },
    infrastructure::repository::InMemorySessionRepository,
};

/// 送信先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    To(ConnectionId),
    Broadcast(Vec<ConnectionId>),
}

/// 送信されたイベントを記録するだけの MessagePusher
#[derive(Default)]
pub struct RecordingPusher {
    sent: Mutex<Vec<(Sent, ServerEvent)>>,
}

impl RecordingPusher {
    pub async fn take(&self) -> Vec<(Sent, ServerEvent)> {
        std::mem::take(&mut *self.sent.lock().await)
    }

    /// 送信されたイベント名だけを順に取り出す
    pub async fn take_names(&self) -> Vec<&'static str> {
        self.take().await.iter().map(|(_, e)| e.name()).collect()
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, _connection_id: ConnectionId, _sender: PusherChannel) {}

    async fn unregister_client(&self, _connection_id: &ConnectionId) {}

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        self.sent
            .lock()
            .await
            .push((Sent::To(connection_id.clone()), event.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        self.sent
            .lock()
            .await
            .push((Sent::Broadcast(targets.to_vec()), event.clone()));
        Ok(())
    }
}

pub fn create_test_repository() -> Arc<InMemorySessionRepository> {
    let registry = Arc::new(Mutex::new(SessionRegistry::default()));
    Arc::new(InMemorySessionRepository::new(registry))
}

pub fn room_id(value: &str) -> RoomId {
    RoomId::new(value.to_string()).unwrap()
}

pub fn conn(value: &str) -> ConnectionId {
    ConnectionId::from_raw(value)
}

pub fn nick(value: &str) -> Nickname {
    Nickname::new(value.to_string()).unwrap()
}

/// Alice (c1, X) と Bob (c2, O) が r1 に参加し、2 人とも準備完了した状態を作る
pub async fn setup_started_match(repository: &InMemorySessionRepository) -> RoomId {
    use crate::domain::SessionRepository;

    let r1 = room_id("r1");
    repository.join(&r1, conn("c1"), nick("Alice")).await.unwrap();
    repository.join(&r1, conn("c2"), nick("Bob")).await.unwrap();
    repository.mark_ready(&r1, &conn("c1")).await.unwrap();
    repository.mark_ready(&r1, &conn("c2")).await.unwrap();
    r1
}
