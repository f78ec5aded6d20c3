//! Axum web server with WebSocket streaming for playback.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stepgraph_core::{Algorithm, Edge, Graph, Trace};
use tower_http::cors::CorsLayer;

use crate::config::VisConfig;
use crate::driver::PlaybackDriver;
use crate::error::{EditError, Result, RunError};
use crate::render::RenderState;
use crate::session::{RunRequest, Session, SessionStatus};

type AppState = Arc<PlaybackDriver>;

/// Visualization server.
pub struct VisServer {
    driver: AppState,
}

impl VisServer {
    /// Create a new server around a session.
    pub fn new(session: Session) -> Self {
        Self::with_driver(Arc::new(PlaybackDriver::new(session)))
    }

    pub fn with_driver(driver: Arc<PlaybackDriver>) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &Arc<PlaybackDriver> {
        &self.driver
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/graph", get(graph_handler).put(load_graph_handler))
            .route("/api/graph/nodes", post(add_node_handler))
            .route("/api/graph/nodes/{id}", delete(remove_node_handler))
            .route("/api/graph/edges", post(add_edge_handler))
            .route("/api/graph/edges/{id}", delete(remove_edge_handler))
            .route("/api/selection/algorithm", put(select_algorithm_handler))
            .route("/api/selection/start", put(set_start_handler))
            .route("/api/selection/end", put(set_end_handler))
            .route("/api/run", post(run_handler))
            .route("/api/run/selected", post(run_selected_handler))
            .route("/api/trace", get(trace_handler).put(load_trace_handler))
            .route("/api/render", get(render_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/step", post(step_handler))
            .route("/api/playback/seek", post(seek_handler))
            .route("/api/playback/speed", post(speed_handler))
            .route("/api/clear", post(clear_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(Arc::clone(&self.driver))
    }

    /// Run the server until it fails.
    pub async fn serve(self, config: &VisConfig) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(config.addr()).await?;
        tracing::info!("Visualization server running on http://{}", config.addr());
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for RunError {
    fn into_response(self) -> Response {
        let status = match self {
            RunError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for EditError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

async fn status_handler(State(driver): State<AppState>) -> Json<SessionStatus> {
    Json(driver.status().await)
}

async fn graph_handler(State(driver): State<AppState>) -> Json<Graph> {
    Json(driver.session().read().await.graph().clone())
}

async fn load_graph_handler(
    State(driver): State<AppState>,
    Json(graph): Json<Graph>,
) -> std::result::Result<Json<SessionStatus>, EditError> {
    driver.load_graph(graph).await.map(Json)
}

#[derive(Deserialize)]
struct AddNodeRequest {
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct AddNodeResponse {
    id: String,
    status: SessionStatus,
}

async fn add_node_handler(
    State(driver): State<AppState>,
    Json(req): Json<AddNodeRequest>,
) -> (StatusCode, Json<AddNodeResponse>) {
    let (id, status) = driver.update(|s| s.add_node(req.x, req.y)).await;
    (StatusCode::CREATED, Json(AddNodeResponse { id, status }))
}

async fn remove_node_handler(
    State(driver): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<SessionStatus>, StatusCode> {
    match driver.update(|s| s.remove_node(&id)).await {
        (true, status) => Ok(Json(status)),
        (false, _) => Err(StatusCode::NOT_FOUND),
    }
}

async fn add_edge_handler(
    State(driver): State<AppState>,
    Json(edge): Json<Edge>,
) -> std::result::Result<(StatusCode, Json<SessionStatus>), EditError> {
    let (outcome, status) = driver.update(|s| s.add_edge(edge)).await;
    outcome.map(|_| (StatusCode::CREATED, Json(status)))
}

async fn remove_edge_handler(
    State(driver): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<SessionStatus>, StatusCode> {
    match driver.update(|s| s.remove_edge(&id)).await {
        (true, status) => Ok(Json(status)),
        (false, _) => Err(StatusCode::NOT_FOUND),
    }
}

async fn run_handler(
    State(driver): State<AppState>,
    Json(req): Json<RunRequest>,
) -> std::result::Result<Json<SessionStatus>, RunError> {
    driver.run(req).await.map(Json)
}

async fn run_selected_handler(
    State(driver): State<AppState>,
) -> std::result::Result<Json<SessionStatus>, RunError> {
    driver.run_selected().await.map(Json)
}

#[derive(Deserialize)]
struct AlgorithmRequest {
    algorithm: Option<Algorithm>,
}

async fn select_algorithm_handler(
    State(driver): State<AppState>,
    Json(req): Json<AlgorithmRequest>,
) -> Json<SessionStatus> {
    Json(driver.select_algorithm(req.algorithm).await)
}

#[derive(Deserialize)]
struct NodeRequest {
    id: Option<String>,
}

async fn set_start_handler(
    State(driver): State<AppState>,
    Json(req): Json<NodeRequest>,
) -> Json<SessionStatus> {
    Json(driver.set_start(req.id).await)
}

async fn set_end_handler(
    State(driver): State<AppState>,
    Json(req): Json<NodeRequest>,
) -> Json<SessionStatus> {
    Json(driver.set_end(req.id).await)
}

/// Loaded trace and the run that produced it, if any.
#[derive(Serialize)]
struct TraceResponse {
    algorithm: Option<Algorithm>,
    start: Option<String>,
    end: Option<String>,
    steps: Trace,
}

async fn trace_handler(State(driver): State<AppState>) -> Json<TraceResponse> {
    let session = driver.session().read().await;
    let run = session.last_run();
    Json(TraceResponse {
        algorithm: run.map(|r| r.algorithm),
        start: run.map(|r| r.start.clone()),
        end: run.and_then(|r| r.end.clone()),
        steps: Trace::clone(session.trace()),
    })
}

async fn load_trace_handler(
    State(driver): State<AppState>,
    Json(trace): Json<Trace>,
) -> Json<SessionStatus> {
    Json(driver.interrupt(|s| s.load_trace(trace)).await.1)
}

async fn render_handler(State(driver): State<AppState>) -> Json<RenderState> {
    Json(driver.session().read().await.render().clone())
}

async fn play_handler(State(driver): State<AppState>) -> Json<SessionStatus> {
    Json(driver.play().await)
}

async fn pause_handler(State(driver): State<AppState>) -> Json<SessionStatus> {
    Json(driver.pause().await)
}

async fn reset_handler(State(driver): State<AppState>) -> Json<SessionStatus> {
    Json(driver.reset().await)
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Direction {
    Forward,
    Backward,
}

#[derive(Deserialize)]
struct StepRequest {
    direction: Direction,
}

async fn step_handler(
    State(driver): State<AppState>,
    Json(req): Json<StepRequest>,
) -> Json<SessionStatus> {
    Json(step(&driver, req.direction).await)
}

async fn step(driver: &PlaybackDriver, direction: Direction) -> SessionStatus {
    match direction {
        Direction::Forward => driver.step_forward().await,
        Direction::Backward => driver.step_backward().await,
    }
}

#[derive(Deserialize)]
struct SeekRequest {
    index: Option<usize>,
}

async fn seek_handler(
    State(driver): State<AppState>,
    Json(req): Json<SeekRequest>,
) -> Json<SessionStatus> {
    Json(driver.seek(req.index).await)
}

#[derive(Deserialize)]
struct SpeedRequest {
    ms: u64,
}

async fn speed_handler(
    State(driver): State<AppState>,
    Json(req): Json<SpeedRequest>,
) -> Json<SessionStatus> {
    Json(driver.set_speed(req.ms).await)
}

async fn clear_handler(State(driver): State<AppState>) -> Json<SessionStatus> {
    Json(driver.clear().await)
}

async fn ws_handler(ws: WebSocketUpgrade, State(driver): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, driver))
}

async fn handle_ws(mut socket: WebSocket, driver: AppState) {
    let mut updates = driver.subscribe();
    let initial = WsResponse::Status(updates.borrow_and_update().clone());
    if send(&mut socket, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => continue,
                };
                let response = match serde_json::from_str::<WsCommand>(&text) {
                    Ok(cmd) => handle_ws_command(&driver, cmd).await,
                    Err(err) => WsResponse::Error { message: err.to_string() },
                };
                // the command already pushed its status through the watch
                let _ = updates.borrow_and_update();
                if send(&mut socket, &response).await.is_err() {
                    break;
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = WsResponse::Status(updates.borrow_and_update().clone());
                if send(&mut socket, &status).await.is_err() {
                    break;
                }
            }
        }
    }
    tracing::debug!("websocket closed");
}

async fn send(socket: &mut WebSocket, response: &WsResponse) -> Result<()> {
    let json = serde_json::to_string(response)?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::BrokenPipe, e))?;
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetStatus,
    GetRender,
    Play,
    Pause,
    Reset,
    Step { direction: Direction },
    Seek { index: Option<usize> },
    Speed { ms: u64 },
    SelectAlgorithm { algorithm: Option<Algorithm> },
    SetStart { id: Option<String> },
    SetEnd { id: Option<String> },
    Run,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Status(SessionStatus),
    Render(RenderState),
    Error { message: String },
}

async fn handle_ws_command(driver: &PlaybackDriver, cmd: WsCommand) -> WsResponse {
    match cmd {
        WsCommand::GetStatus => WsResponse::Status(driver.status().await),
        WsCommand::GetRender => {
            WsResponse::Render(driver.session().read().await.render().clone())
        }
        WsCommand::Play => WsResponse::Status(driver.play().await),
        WsCommand::Pause => WsResponse::Status(driver.pause().await),
        WsCommand::Reset => WsResponse::Status(driver.reset().await),
        WsCommand::Step { direction } => WsResponse::Status(step(driver, direction).await),
        WsCommand::Seek { index } => WsResponse::Status(driver.seek(index).await),
        WsCommand::Speed { ms } => WsResponse::Status(driver.set_speed(ms).await),
        WsCommand::SelectAlgorithm { algorithm } => {
            WsResponse::Status(driver.select_algorithm(algorithm).await)
        }
        WsCommand::SetStart { id } => WsResponse::Status(driver.set_start(id).await),
        WsCommand::SetEnd { id } => WsResponse::Status(driver.set_end(id).await),
        WsCommand::Run => match driver.run_selected().await {
            Ok(status) => WsResponse::Status(status),
            Err(err) => WsResponse::Error {
                message: err.to_string(),
            },
        },
    }
}
