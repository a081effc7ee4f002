pub mod registry;
pub mod tasks;

use crate::config::WorkflowConfig;
use crate::core::session::SessionRunner;
use crate::domain::model::{TaskPayload, TaskRequest};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use registry::SubscriberRegistry;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared server state. `runner` is None when the automation capability was
/// unavailable at startup; every task submission is then rejected.
pub struct AppState {
    pub registry: Arc<SubscriberRegistry>,
    pub runner: Option<SessionRunner>,
    pub workflow_config: Arc<WorkflowConfig>,
}

impl AppState {
    pub fn new(runner: Option<SessionRunner>, workflow_config: Arc<WorkflowConfig>) -> Self {
        Self {
            registry: Arc::new(SubscriberRegistry::new()),
            runner,
            workflow_config,
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/task", post(create_task))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "dealrun server running" }))
}

/// Accept a task and immediately acknowledge it; the actual work runs in the
/// background and reports only through the WebSocket channel.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TaskPayload>,
) -> Response {
    let Some(runner) = state.runner.clone() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "rejected",
                "message": "automation agent unavailable"
            })),
        )
            .into_response();
    };

    let request = match TaskRequest::try_from(payload) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({
                    "status": "rejected",
                    "message": e.to_string()
                })),
            )
                .into_response();
        }
    };

    tracing::info!("Task accepted for persona: {}", request.persona_label());
    tokio::spawn(tasks::run_task(state.clone(), runner, request));

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "accepted",
            "message": "Task queued"
        })),
    )
        .into_response()
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Pump broadcast lines out to one subscriber. Inbound frames are used only
/// to notice the disconnect; clients are not expected to send anything.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (id, mut outbound) = state.registry.register().await;
    tracing::info!("WebSocket subscriber connected: {}", id);

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            line = outbound.recv() => {
                match line {
                    Some(line) => {
                        if ws_tx.send(Message::Text(line.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            incoming = ws_rx.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.registry.unregister(&id).await;
    tracing::info!("WebSocket subscriber disconnected: {}", id);
}
