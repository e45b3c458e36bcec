//! Axum web server with WebSocket streaming for step playback.

use std::sync::Arc;

use algoviz_trace::{generate_trace, MstEdge, ResultKind, TraceFamily};
use axum::{
    extract::{
        rejection::JsonRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;

use crate::config::VisConfig;
use crate::diagram::{render_dp_table, render_graph_progress_svg, render_graph_svg, GraphStyle};
use crate::error::{Error, Result};
use crate::explain::{explain_value, Explanation};
use crate::playback::{PlaybackController, PlaybackStatus};
use crate::render::{BroadcastTarget, Frame};

/// Frames buffered per WebSocket client before it starts lagging.
const FRAME_BUFFER: usize = 64;

/// Shared application state.
pub struct AppState {
    playback: PlaybackController,
    frames: BroadcastTarget,
    config: VisConfig,
}

impl AppState {
    fn status(&self) -> PlaybackStatus {
        self.playback.status()
    }

    fn current_frame(&self) -> Frame {
        self.frames.latest().unwrap_or_else(Frame::placeholder)
    }

    fn visualize(&self, family: TraceFamily, payload: &Value) -> VisualizeResponse {
        let trace = generate_trace(family, payload);
        let steps = trace.len();
        self.playback.load(trace);
        tracing::info!(%family, steps, "visualization loaded");
        VisualizeResponse {
            family,
            steps,
            status: self.status(),
            frame: self.current_frame(),
        }
    }

    fn set_speed(&self, requested_ms: u64) -> PlaybackStatus {
        let speed_ms = self.config.clamp_speed(requested_ms);
        if speed_ms != requested_ms {
            tracing::debug!(requested_ms, speed_ms, "speed clamped");
        }
        self.playback.set_speed(speed_ms);
        self.status()
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server with an idle playback controller.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: VisConfig) -> Result<Self> {
        let frames = BroadcastTarget::new(FRAME_BUFFER);
        let playback = PlaybackController::with_speed(frames.clone(), config.speed_ms)?;
        Ok(Self {
            state: Arc::new(AppState {
                playback,
                frames,
                config,
            }),
        })
    }

    /// The controller driven by this server.
    pub fn playback(&self) -> &PlaybackController {
        &self.state.playback
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/api/visualize", post(visualize_handler))
            .route("/api/frame", get(frame_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/speed", post(speed_handler))
            .route("/api/explain", post(explain_handler))
            .route("/api/diagram/graph", post(graph_handler))
            .route("/api/diagram/table", post(table_handler))
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured address.
    pub async fn serve(self) -> Result<()> {
        let addr = self.state.config.addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Visualization server running on http://{}", addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// JSON error body with a status code.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Payload(_) => Self::bad_request(err.to_string()),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, message = %self.message, "request rejected");
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

#[derive(Deserialize)]
struct VisualizeRequest {
    family: TraceFamily,
    payload: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisualizeResponse {
    pub family: TraceFamily,
    pub steps: usize,
    pub status: PlaybackStatus,
    pub frame: Frame,
}

async fn visualize_handler(
    State(state): State<Arc<AppState>>,
    request: std::result::Result<Json<VisualizeRequest>, JsonRejection>,
) -> ApiResult<Json<VisualizeResponse>> {
    let Json(req) = request?;
    Ok(Json(state.visualize(req.family, &req.payload)))
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Json<Frame> {
    Json(state.current_frame())
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.status())
}

async fn play_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    state.playback.play();
    Json(state.status())
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    state.playback.pause();
    Json(state.status())
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    state.playback.reset();
    Json(state.status())
}

#[derive(Deserialize)]
struct SpeedRequest {
    speed_ms: u64,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    request: std::result::Result<Json<SpeedRequest>, JsonRejection>,
) -> ApiResult<Json<PlaybackStatus>> {
    let Json(req) = request?;
    Ok(Json(state.set_speed(req.speed_ms)))
}

#[derive(Deserialize)]
struct ExplainRequest {
    kind: ResultKind,
    payload: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub explanation: Explanation,
    pub html: String,
}

async fn explain_handler(
    request: std::result::Result<Json<ExplainRequest>, JsonRejection>,
) -> ApiResult<Json<ExplainResponse>> {
    let Json(req) = request?;
    let explanation = explain_value(req.kind, &req.payload)?;
    let html = explanation.to_html();
    Ok(Json(ExplainResponse { explanation, html }))
}

#[derive(Deserialize)]
struct GraphRequest {
    #[serde(alias = "mst")]
    edges: Vec<MstEdge>,
    /// Draw only the first `upto` edges, as after that many trace steps
    upto: Option<usize>,
    #[serde(default)]
    style: GraphStyle,
}

async fn graph_handler(
    request: std::result::Result<Json<GraphRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = request?;
    let svg = match req.upto {
        Some(upto) => render_graph_progress_svg(&req.edges, upto, &req.style),
        None => render_graph_svg(&req.edges, &req.style),
    };
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

#[derive(Deserialize)]
struct TableRequest {
    #[serde(alias = "tablaDP")]
    tabla: Vec<Vec<f64>>,
}

async fn table_handler(
    request: std::result::Result<Json<TableRequest>, JsonRejection>,
) -> ApiResult<Html<String>> {
    let Json(req) = request?;
    Ok(Html(render_dp_table(&req.tabla)))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut frames = state.frames.subscribe();

    // Catch the new viewer up before streaming
    for response in [
        WsResponse::Status(state.status()),
        WsResponse::Frame(state.current_frame()),
    ] {
        if send(&mut socket, &response).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let text = match incoming {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => continue,
                };
                let response = match serde_json::from_str::<WsCommand>(text.as_str()) {
                    Ok(cmd) => handle_ws_command(&state, cmd),
                    Err(e) => WsResponse::Error { message: e.to_string() },
                };
                if send(&mut socket, &response).await.is_err() {
                    break;
                }
            }
            frame = frames.recv() => match frame {
                Ok(frame) => {
                    if send(&mut socket, &WsResponse::Frame(frame)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "viewer lagging, frames dropped");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
    tracing::debug!("viewer disconnected");
}

async fn send(socket: &mut WebSocket, response: &WsResponse) -> std::result::Result<(), axum::Error> {
    match serde_json::to_string(response) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            tracing::warn!(error = %e, "unserializable ws response");
            Ok(())
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetStatus,
    GetFrame,
    Visualize { family: TraceFamily, payload: Value },
    Play,
    Pause,
    Reset,
    SetSpeed { speed_ms: u64 },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Status(PlaybackStatus),
    Frame(Frame),
    Loaded { steps: usize, status: PlaybackStatus },
    Error { message: String },
}

fn handle_ws_command(state: &AppState, cmd: WsCommand) -> WsResponse {
    match cmd {
        WsCommand::GetStatus => WsResponse::Status(state.status()),
        WsCommand::GetFrame => WsResponse::Frame(state.current_frame()),
        WsCommand::Visualize { family, payload } => {
            let loaded = state.visualize(family, &payload);
            WsResponse::Loaded {
                steps: loaded.steps,
                status: loaded.status,
            }
        }
        WsCommand::Play => {
            state.playback.play();
            WsResponse::Status(state.status())
        }
        WsCommand::Pause => {
            state.playback.pause();
            WsResponse::Status(state.status())
        }
        WsCommand::Reset => {
            state.playback.reset();
            WsResponse::Status(state.status())
        }
        WsCommand::SetSpeed { speed_ms } => WsResponse::Status(state.set_speed(speed_ms)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;
    use serde_json::json;

    fn state() -> AppState {
        let frames = BroadcastTarget::new(8);
        AppState {
            playback: PlaybackController::with_speed(frames.clone(), 800).unwrap(),
            frames,
            config: VisConfig::default(),
        }
    }

    #[tokio::test]
    async fn router_builds() {
        let server = VisServer::new(VisConfig::default()).unwrap();
        let _router = server.router();
    }

    #[tokio::test(start_paused = true)]
    async fn ws_commands_drive_playback() {
        let state = state();

        let loaded = handle_ws_command(
            &state,
            WsCommand::Visualize {
                family: TraceFamily::GreedyFuel,
                payload: json!({ "cantidadRequerida": 17, "tamanosDisponibles": [10, 5, 1] }),
            },
        );
        assert!(matches!(loaded, WsResponse::Loaded { steps: 4, .. }));

        match handle_ws_command(&state, WsCommand::Play) {
            WsResponse::Status(status) => {
                assert_eq!(status.state, PlaybackState::Playing);
                assert_eq!(status.position, 1);
            }
            other => panic!("unexpected response {other:?}"),
        }

        match handle_ws_command(&state, WsCommand::SetSpeed { speed_ms: 5 }) {
            WsResponse::Status(status) => assert_eq!(status.speed_ms, 200),
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn ws_command_wire_format() {
        let cmd: WsCommand = serde_json::from_str(r#"{"type":"set_speed","speed_ms":400}"#).unwrap();
        assert!(matches!(cmd, WsCommand::SetSpeed { speed_ms: 400 }));

        let response = serde_json::to_value(WsResponse::Error { message: "x".into() }).unwrap();
        assert_eq!(response["type"], "error");
    }
}
