//! Server execution logic.

use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use sanmoku_shared::time::Clock;
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::trace::TraceLayer;

use crate::{
    config::GameConfig,
    domain::SessionRegistry,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, GetRoomDetailUseCase,
        GetRoomHistoryUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        MakeMoveUseCase, MarkReadyUseCase, ReportErrorUseCase, RequestHistoryUseCase,
        ResetGameUseCase, SendChatUseCase, StartMatchUseCase,
    },
};

use super::{
    event_loop::{EventLoop, GameUseCases},
    handler::{get_room_detail, get_room_history, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket game server
///
/// # Example
///
/// ```ignore
/// let server = Server::in_memory(&GameConfig::default(), Arc::new(SystemClock));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// イベントループが呼び出すユースケース
    game_usecases: GameUseCases,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetRoomHistoryUseCase（対局履歴取得のユースケース）
    get_room_history_usecase: Arc<GetRoomHistoryUseCase>,
    /// 準備完了から対局開始までの待ち時間
    start_delay: Duration,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        game_usecases: GameUseCases,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
        get_room_history_usecase: Arc<GetRoomHistoryUseCase>,
        start_delay: Duration,
    ) -> Self {
        Self {
            game_usecases,
            get_rooms_usecase,
            get_room_detail_usecase,
            get_room_history_usecase,
            start_delay,
        }
    }

    /// インメモリの Session Registry と WebSocket の MessagePusher で組み立てる
    ///
    /// Initialize dependencies in order:
    /// 1. Repository
    /// 2. MessagePusher
    /// 3. UseCases
    pub fn in_memory(config: &GameConfig, clock: Arc<dyn Clock>) -> Self {
        // 1. Create Repository (in-memory database)
        let registry = Arc::new(Mutex::new(SessionRegistry::new(
            config.history_limit,
            config.chat_log_limit,
        )));
        let repository = Arc::new(InMemorySessionRepository::new(registry));

        // 2. Create MessagePusher (WebSocket implementation)
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));

        // 3. Create UseCases
        let game_usecases = GameUseCases {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            mark_ready_usecase: Arc::new(MarkReadyUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            start_match_usecase: Arc::new(StartMatchUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            make_move_usecase: Arc::new(MakeMoveUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            reset_game_usecase: Arc::new(ResetGameUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            send_chat_usecase: Arc::new(SendChatUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
            )),
            request_history_usecase: Arc::new(RequestHistoryUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            report_error_usecase: Arc::new(ReportErrorUseCase::new(message_pusher)),
        };

        Self::new(
            game_usecases,
            Arc::new(GetRoomsUseCase::new(repository.clone())),
            Arc::new(GetRoomDetailUseCase::new(repository.clone())),
            Arc::new(GetRoomHistoryUseCase::new(repository)),
            config.start_delay,
        )
    }

    /// Run the WebSocket game server until Ctrl+C or SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (event_loop, commands) = EventLoop::new(self.game_usecases, self.start_delay);
        let event_loop_handle = event_loop.spawn();

        let app_state = Arc::new(AppState {
            commands,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
            get_room_history_usecase: self.get_room_history_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .route("/api/rooms/{room_id}/history", get(get_room_history))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        tracing::info!("Game server listening on {}", listener.local_addr()?);

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        event_loop_handle.abort();
        tracing::info!("Server shutdown complete");

        result
    }
}
