//! HTTP/WebSocket surface of the dashboard.
//!
//! REST endpoints serve the on-demand queries; `/ws` carries the push
//! channel. Every handler goes through [`AppState`]; errors map to 400 for
//! validation and 500 for store failures.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use wflow_core::FlowError;

use storage::StorageError;

use crate::config::ServerConfig;
use crate::state::AppState;
use crate::wire::{wire_messages, WireMessage};

/// Period of the server-side ping that keeps idle viewer connections alive.
const HEARTBEAT_PERIOD: Duration = Duration::from_secs(30);

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/simulate", post(simulate))
        .route("/messages", get(messages))
        .route("/stats", get(stats))
        .route("/hourly", get(hourly))
        .route("/users", get(users))
        .route("/clear", post(clear))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(&config).await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Dashboard listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// FlowError with an HTTP mapping: validation is the caller's fault,
/// everything else is ours.
struct ApiError(FlowError);

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        Self(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            FlowError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct SimulateRequest {
    sender: Option<String>,
    text: Option<String>,
    /// When set, record an outbound delivery failure instead of an inbound
    /// exchange.
    #[serde(default)]
    failed: bool,
}

#[derive(Debug, Serialize)]
struct SimulateResponse {
    ok: bool,
    /// Inbound plus auto-reply for an exchange, a single record for a
    /// failed delivery.
    messages: Vec<WireMessage>,
}

async fn simulate(
    State(state): State<AppState>,
    body: Option<Json<SimulateRequest>>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let messages = if request.failed {
        let record = state
            .ingestor
            .record_failed_outbound(request.sender, request.text)
            .await?;
        vec![WireMessage::from(&record)]
    } else {
        let (inbound, reply) = state
            .ingestor
            .record_inbound(request.sender, request.text)
            .await?;
        vec![WireMessage::from(&inbound), WireMessage::from(&reply)]
    };

    Ok(Json(SimulateResponse { ok: true, messages }))
}

#[derive(Debug, Deserialize)]
struct MessagesParams {
    limit: Option<i64>,
    search: Option<String>,
}

async fn messages(
    State(state): State<AppState>,
    Query(params): Query<MessagesParams>,
) -> Result<Json<Vec<WireMessage>>, ApiError> {
    let records = state
        .query
        .search(params.search.as_deref(), params.limit)
        .await?;
    Ok(Json(wire_messages(&records)))
}

async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.aggregates.snapshot_stats().await?;
    Ok(Json(stats))
}

async fn hourly(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let hourly = state.aggregates.snapshot_hourly().await?;
    Ok(Json(hourly))
}

async fn users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.store.list_users().await?;
    Ok(Json(users))
}

async fn clear(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.ingestor.clear_and_notify().await?;
    Ok(Json(json!({ "ok": true })))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| viewer_loop(socket, state))
}

/// Per-connection task: subscribe, send the initial snapshot, then pump
/// broadcast frames and heartbeats until the socket dies.
async fn viewer_loop(socket: WebSocket, state: AppState) {
    let (id, mut rx) = state.registry.subscribe();
    info!(subscriber = id, viewers = state.registry.len(), "Viewer connected");

    let init = match state.query.initial_snapshot().await {
        Ok(frame) => frame,
        Err(e) => {
            warn!(subscriber = id, "Failed to build initial snapshot: {}", e);
            state.registry.unsubscribe(id);
            return;
        }
    };

    let (mut sink, mut stream) = socket.split();

    let init_payload = match serde_json::to_string(&init) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(subscriber = id, "Failed to serialize initial snapshot: {}", e);
            state.registry.unsubscribe(id);
            return;
        }
    };
    if sink.send(Message::Text(init_payload)).await.is_err() {
        state.registry.unsubscribe(id);
        return;
    }

    let mut heartbeat = tokio::time::interval(HEARTBEAT_PERIOD);
    heartbeat.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            frame = rx.recv() => match frame {
                Some(payload) => {
                    if sink.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                // The registry dropped this subscriber after a failed
                // delivery; nothing more will arrive.
                None => break,
            },
            _ = heartbeat.tick() => {
                if sink.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Pongs and client chatter are ignored.
                Some(Ok(_)) => {}
            },
        }
    }

    state.registry.unsubscribe(id);
    info!(subscriber = id, viewers = state.registry.len(), "Viewer disconnected");
}
