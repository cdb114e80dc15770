//! Event loop
//!
//! 全コネクションから届くイベントを 1 つのタスクで順番に処理する。
//! 1 つのイベントの処理が終わるまで次のイベントには進まないため、
//! Room の状態を変更するのは常にこのタスクだけになる。
//!
//! 対局開始の遅延はブロッキングせず、Room ごとのタイマータスクが
//! `Command::StartDue` をこのループに送り返すことで実現する。

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ClientIntent, ConnectionId, PusherChannel, RoomId},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        MakeMoveUseCase, MarkReadyUseCase, ReportErrorUseCase, RequestHistoryUseCase,
        ResetGameUseCase, SendChatUseCase, StartMatchUseCase,
    },
};

/// イベントループへの送信口
pub type CommandSender = mpsc::UnboundedSender<Command>;

/// イベントループが処理する 1 件の入力
#[derive(Debug)]
pub enum Command {
    /// WebSocket 接続が確立した
    Connect {
        connection_id: ConnectionId,
        sender: PusherChannel,
    },
    /// クライアントのイベント
    Intent {
        connection_id: ConnectionId,
        intent: ClientIntent,
    },
    /// デコードできたが値が不正だったイベント
    Rejected {
        connection_id: ConnectionId,
        event: &'static str,
        feedback: Option<String>,
    },
    /// WebSocket 接続が閉じた
    Disconnected { connection_id: ConnectionId },
    /// 対局開始の待ち時間が経過した
    StartDue { room_id: RoomId, generation: u64 },
}

/// イベントループが呼び出すユースケース
pub struct GameUseCases {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub mark_ready_usecase: Arc<MarkReadyUseCase>,
    pub start_match_usecase: Arc<StartMatchUseCase>,
    pub make_move_usecase: Arc<MakeMoveUseCase>,
    pub reset_game_usecase: Arc<ResetGameUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub send_chat_usecase: Arc<SendChatUseCase>,
    pub request_history_usecase: Arc<RequestHistoryUseCase>,
    pub report_error_usecase: Arc<ReportErrorUseCase>,
}

/// 予約済みの対局開始
struct PendingStart {
    generation: u64,
    timer: JoinHandle<()>,
}

/// Event loop
pub struct EventLoop {
    usecases: GameUseCases,
    start_delay: Duration,
    commands: CommandSender,
    receiver: mpsc::UnboundedReceiver<Command>,
    pending_starts: HashMap<RoomId, PendingStart>,
    next_generation: u64,
}

impl EventLoop {
    /// 新しい EventLoop と、そこへイベントを送るための sender を作成
    pub fn new(usecases: GameUseCases, start_delay: Duration) -> (Self, CommandSender) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let event_loop = Self {
            usecases,
            start_delay,
            commands: commands.clone(),
            receiver,
            pending_starts: HashMap::new(),
            next_generation: 0,
        };
        (event_loop, commands)
    }

    /// ループを別タスクで開始する
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// イベントを処理し続ける（停止は呼び出し側がタスクを abort する）
    pub async fn run(mut self) {
        tracing::debug!("Event loop started");
        while let Some(command) = self.receiver.recv().await {
            self.handle(command).await;
        }
        for (_, pending) in self.pending_starts.drain() {
            pending.timer.abort();
        }
        tracing::debug!("Event loop stopped");
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Connect {
                connection_id,
                sender,
            } => {
                self.usecases
                    .connect_client_usecase
                    .execute(connection_id, sender)
                    .await;
            }
            Command::Intent {
                connection_id,
                intent,
            } => self.dispatch(connection_id, intent).await,
            Command::Rejected {
                connection_id,
                event,
                feedback,
            } => match feedback {
                Some(message) => {
                    tracing::info!("Rejected '{}' from '{}': {}", event, connection_id, message);
                    self.usecases
                        .report_error_usecase
                        .send(&connection_id, message)
                        .await;
                }
                None => {
                    tracing::debug!("Dropping invalid '{}' from '{}'", event, connection_id);
                }
            },
            Command::Disconnected { connection_id } => {
                let departed = self
                    .usecases
                    .disconnect_client_usecase
                    .execute(&connection_id)
                    .await;
                for room_id in &departed {
                    self.cancel_start(room_id);
                }
            }
            Command::StartDue {
                room_id,
                generation,
            } => {
                let is_current = self
                    .pending_starts
                    .get(&room_id)
                    .is_some_and(|pending| pending.generation == generation);
                if !is_current {
                    tracing::debug!("Ignoring superseded start for room '{}'", room_id);
                    return;
                }
                self.pending_starts.remove(&room_id);
                self.usecases.start_match_usecase.execute(&room_id).await;
            }
        }
    }

    async fn dispatch(&mut self, connection_id: ConnectionId, intent: ClientIntent) {
        let event = intent.name();
        tracing::debug!("Handling '{}' from '{}'", event, connection_id);

        let result = match intent {
            ClientIntent::JoinRoom { room, nickname } => self
                .usecases
                .join_room_usecase
                .execute(&connection_id, &room, nickname)
                .await
                .map(|_| ()),
            ClientIntent::Ready { room } => {
                if self
                    .usecases
                    .mark_ready_usecase
                    .execute(&connection_id, &room)
                    .await
                {
                    self.schedule_start(room);
                }
                Ok(())
            }
            ClientIntent::MakeMove {
                room,
                symbol,
                index,
            } => self
                .usecases
                .make_move_usecase
                .execute(&room, symbol, index)
                .await
                .map(|_| ()),
            ClientIntent::ResetGame { room } => {
                self.cancel_start(&room);
                self.usecases.reset_game_usecase.execute(&room).await;
                Ok(())
            }
            ClientIntent::LeaveRoom { room } => {
                if self
                    .usecases
                    .leave_room_usecase
                    .execute(&connection_id, &room)
                    .await
                    .is_some()
                {
                    self.cancel_start(&room);
                }
                Ok(())
            }
            ClientIntent::SendMessage { room, text } => {
                self.usecases
                    .send_chat_usecase
                    .execute(&connection_id, &room, &text)
                    .await
            }
            ClientIntent::RequestGameHistory { room } => {
                self.usecases
                    .request_history_usecase
                    .execute(&connection_id, room.as_ref())
                    .await;
                Ok(())
            }
        };

        if let Err(error) = result {
            self.usecases
                .report_error_usecase
                .execute(&connection_id, event, &error)
                .await;
        }
    }

    /// 待ち時間の後に対局開始を予約する。同じ Room の古い予約は置き換える
    fn schedule_start(&mut self, room_id: RoomId) {
        self.cancel_start(&room_id);
        self.next_generation += 1;
        let generation = self.next_generation;

        let commands = self.commands.clone();
        let delay = self.start_delay;
        let due_room = room_id.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = commands.send(Command::StartDue {
                room_id: due_room,
                generation,
            });
        });

        tracing::debug!("Match in room '{}' starts in {:?}", room_id, delay);
        self.pending_starts
            .insert(room_id, PendingStart { generation, timer });
    }

    fn cancel_start(&mut self, room_id: &RoomId) {
        if let Some(pending) = self.pending_starts.remove(room_id) {
            pending.timer.abort();
            tracing::debug!("Cancelled pending start for room '{}'", room_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellIndex, GameError, Nickname, ServerEvent, Symbol};
    use crate::infrastructure::dto::websocket::ClientEvent;
    use crate::usecase::test_support::{
        RecordingPusher, Sent, conn, create_test_repository, room_id,
    };
    use sanmoku_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - イベントがユースケースに振り分けられること
    // - エラーの宛先ポリシー（本人に返す / 黙って捨てる）
    // - 対局開始の遅延、リセットによる取り消し、予約の置き換え
    //
    // 【なぜこのテストが必要か】
    // - 遅延中に状態が変わったときに古い gameStart が出てはならない
    // ========================================

    const START_DELAY: Duration = Duration::from_millis(50);

    fn create_event_loop() -> (CommandSender, Arc<RecordingPusher>, JoinHandle<()>) {
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingPusher::default());
        let clock = Arc::new(FixedClock::new(0));
        let usecases = GameUseCases {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(pusher.clone())),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                repository.clone(),
                pusher.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(repository.clone(), pusher.clone())),
            mark_ready_usecase: Arc::new(MarkReadyUseCase::new(
                repository.clone(),
                pusher.clone(),
            )),
            start_match_usecase: Arc::new(StartMatchUseCase::new(
                repository.clone(),
                pusher.clone(),
            )),
            make_move_usecase: Arc::new(MakeMoveUseCase::new(
                repository.clone(),
                pusher.clone(),
                clock.clone(),
            )),
            reset_game_usecase: Arc::new(ResetGameUseCase::new(
                repository.clone(),
                pusher.clone(),
            )),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new(
                repository.clone(),
                pusher.clone(),
            )),
            send_chat_usecase: Arc::new(SendChatUseCase::new(
                repository.clone(),
                pusher.clone(),
                clock,
            )),
            request_history_usecase: Arc::new(RequestHistoryUseCase::new(
                repository,
                pusher.clone(),
            )),
            report_error_usecase: Arc::new(ReportErrorUseCase::new(pusher.clone())),
        };
        let (event_loop, commands) = EventLoop::new(usecases, START_DELAY);
        (commands, pusher, event_loop.spawn())
    }

    fn send(commands: &CommandSender, connection_id: &str, intent: ClientIntent) {
        commands
            .send(Command::Intent {
                connection_id: conn(connection_id),
                intent,
            })
            .unwrap();
    }

    fn join(commands: &CommandSender, connection_id: &str, room: &str, nickname: &str) {
        send(
            commands,
            connection_id,
            ClientIntent::JoinRoom {
                room: room_id(room),
                nickname: Nickname::new(nickname.to_string()).unwrap(),
            },
        );
    }

    fn ready(commands: &CommandSender, connection_id: &str, room: &str) {
        send(commands, connection_id, ClientIntent::Ready { room: room_id(room) });
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    async fn count_game_starts(pusher: &RecordingPusher) -> usize {
        pusher
            .take()
            .await
            .iter()
            .filter(|(_, e)| matches!(e, ServerEvent::GameStart { .. }))
            .count()
    }

    #[tokio::test]
    async fn test_game_start_is_sent_after_delay() {
        // テスト項目: 2 人とも準備完了すると、待ち時間の後に 1 回だけ gameStart が届く
        // given (前提条件):
        let (commands, pusher, _handle) = create_event_loop();
        join(&commands, "c1", "r1", "Alice");
        join(&commands, "c2", "r1", "Bob");

        // when (操作):
        ready(&commands, "c1", "r1");
        ready(&commands, "c2", "r1");
        settle().await;
        let before_delay = count_game_starts(&pusher).await;
        tokio::time::sleep(START_DELAY * 2).await;

        // then (期待する結果):
        assert_eq!(before_delay, 0);
        assert_eq!(count_game_starts(&pusher).await, 1);
    }

    #[tokio::test]
    async fn test_history_request_without_room_gets_empty_reply() {
        // テスト項目: Room を指定しない履歴要求には本人にだけ空の gameHistoryUpdate が返る
        // given (前提条件):
        let (commands, pusher, _handle) = create_event_loop();
        let frame = r#"{"event":"requestGameHistory","data":{}}"#;
        let event: ClientEvent = serde_json::from_str(frame).unwrap();
        let intent = ClientIntent::try_from(event).unwrap();

        // when (操作):
        send(&commands, "c1", intent);
        settle().await;

        // then (期待する結果):
        assert_eq!(
            pusher.take().await,
            vec![(Sent::To(conn("c1")), ServerEvent::HistoryUpdate(vec![]))]
        );
    }

    #[tokio::test]
    async fn test_reset_during_delay_cancels_start() {
        // テスト項目: 待ち時間中にリセットすると gameStart は送られない
        // given (前提条件):
        let (commands, pusher, _handle) = create_event_loop();
        join(&commands, "c1", "r1", "Alice");
        join(&commands, "c2", "r1", "Bob");
        ready(&commands, "c1", "r1");
        ready(&commands, "c2", "r1");

        // when (操作):
        send(&commands, "c1", ClientIntent::ResetGame { room: room_id("r1") });
        tokio::time::sleep(START_DELAY * 3).await;

        // then (期待する結果):
        assert_eq!(count_game_starts(&pusher).await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_during_delay_cancels_start() {
        // テスト項目: 待ち時間中に相手が切断すると gameStart は送られない
        // given (前提条件):
        let (commands, pusher, _handle) = create_event_loop();
        join(&commands, "c1", "r1", "Alice");
        join(&commands, "c2", "r1", "Bob");
        ready(&commands, "c1", "r1");
        ready(&commands, "c2", "r1");

        // when (操作):
        commands
            .send(Command::Disconnected {
                connection_id: conn("c2"),
            })
            .unwrap();
        tokio::time::sleep(START_DELAY * 3).await;

        // then (期待する結果):
        assert_eq!(count_game_starts(&pusher).await, 0);
    }

    #[tokio::test]
    async fn test_superseded_start_is_ignored() {
        // テスト項目: 置き換えられた古い予約の StartDue は無視される
        // given (前提条件):
        let (commands, pusher, _handle) = create_event_loop();
        join(&commands, "c1", "r1", "Alice");
        join(&commands, "c2", "r1", "Bob");
        ready(&commands, "c1", "r1");
        ready(&commands, "c2", "r1");
        settle().await;

        // when (操作):
        commands
            .send(Command::StartDue {
                room_id: room_id("r1"),
                generation: 0,
            })
            .unwrap();
        settle().await;
        let early = count_game_starts(&pusher).await;
        tokio::time::sleep(START_DELAY * 2).await;

        // then (期待する結果):
        assert_eq!(early, 0);
        assert_eq!(count_game_starts(&pusher).await, 1);
    }

    #[tokio::test]
    async fn test_move_error_is_reported_to_sender_only() {
        // テスト項目: 手番違いの着手は本人にだけ gameError が返される
        // given (前提条件):
        let (commands, pusher, _handle) = create_event_loop();
        join(&commands, "c1", "r1", "Alice");
        join(&commands, "c2", "r1", "Bob");
        ready(&commands, "c1", "r1");
        ready(&commands, "c2", "r1");
        settle().await;
        pusher.take().await;

        // when (操作):
        send(
            &commands,
            "c2",
            ClientIntent::MakeMove {
                room: room_id("r1"),
                symbol: Symbol::O,
                index: CellIndex::new(0).unwrap(),
            },
        );
        settle().await;

        // then (期待する結果):
        assert_eq!(
            pusher.take().await,
            vec![(
                Sent::To(conn("c2")),
                ServerEvent::GameError {
                    message: GameError::NotYourTurn.to_string()
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_duplicate_nickname_is_reported() {
        // テスト項目: 大文字小文字違いのニックネームでの参加は本人にだけ拒否が返される
        // given (前提条件):
        let (commands, pusher, _handle) = create_event_loop();
        join(&commands, "c1", "r1", "Alice");
        settle().await;
        pusher.take().await;

        // when (操作):
        join(&commands, "c2", "r1", "alice");
        settle().await;

        // then (期待する結果):
        assert_eq!(
            pusher.take().await,
            vec![(
                Sent::To(conn("c2")),
                ServerEvent::GameError {
                    message: "Nickname already in use.".to_string()
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_rejected_frame_feedback() {
        // テスト項目: 値が不正なフレームはフィードバックがあれば本人に返し、なければ捨てる
        // given (前提条件):
        let (commands, pusher, _handle) = create_event_loop();

        // when (操作):
        commands
            .send(Command::Rejected {
                connection_id: conn("c1"),
                event: "makeMove",
                feedback: Some("Invalid cell.".to_string()),
            })
            .unwrap();
        commands
            .send(Command::Rejected {
                connection_id: conn("c1"),
                event: "ready",
                feedback: None,
            })
            .unwrap();
        settle().await;

        // then (期待する結果):
        assert_eq!(
            pusher.take().await,
            vec![(
                Sent::To(conn("c1")),
                ServerEvent::GameError {
                    message: "Invalid cell.".to_string()
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_chat_from_non_member_is_dropped() {
        // テスト項目: メンバーでないコネクションのチャットは黙って捨てられる
        // given (前提条件):
        let (commands, pusher, _handle) = create_event_loop();
        join(&commands, "c1", "r1", "Alice");
        settle().await;
        pusher.take().await;

        // when (操作):
        send(
            &commands,
            "c9",
            ClientIntent::SendMessage {
                room: room_id("r1"),
                text: "hello".to_string(),
            },
        );
        settle().await;

        // then (期待する結果):
        assert!(pusher.take().await.is_empty());
    }
}
