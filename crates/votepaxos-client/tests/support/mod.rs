//! In-process stand-in for the VotePaxos backend: the REST routes plus a
//! WebSocket that speaks Phoenix serializer v2.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{
    ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
    Path, Query, State,
};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex as AsyncMutex};
use tracing::debug;
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

pub const PREFLIGHT_ID: &str = "human-1";
/// Joining this topic is refused.
pub const REJECTED_TOPIC: &str = "voter:banned";
/// A policy with this description gets an `error` reply.
pub const REJECTED_POLICY: &str = "Abolish voting";
/// A policy with this description never gets a reply.
pub const IGNORED_POLICY: &str = "Postpone everything";
/// Pushing this command makes the server drop the connection.
pub const HANG_UP: &str = "hang_up";

#[derive(Clone, Default)]
pub struct MockState {
    pub voters: Arc<AsyncMutex<Vec<Value>>>,
    pub calls: Arc<AsyncMutex<Vec<String>>>,
    pub socket_queries: Arc<AsyncMutex<Vec<HashMap<String, String>>>>,
    pub pushes: Arc<AsyncMutex<Vec<(String, String, Value)>>>,
    next_voter: Arc<AsyncMutex<u32>>,
}

impl MockState {
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn pushed_events(&self) -> Vec<String> {
        self.pushes
            .lock()
            .await
            .iter()
            .map(|(_, event, _)| event.clone())
            .collect()
    }
}

pub struct MockBackend {
    pub addr: SocketAddr,
    pub state: MockState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockBackend {
    pub async fn start() -> Self {
        init_tracing();
        let state = MockState::default();
        let router = build_router(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener bind");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });
        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn init_tracing() {
    let _ = SubscriberBuilder::default()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn build_router(state: MockState) -> Router {
    Router::new()
        .route("/api/preflight", post(preflight))
        .route("/api/spawn/:count", post(spawn))
        .route("/api/terminate/:id", post(terminate_one))
        .route("/api/terminate", post(terminate_all))
        .route("/api/refresh", get(refresh))
        .route("/api/realtime/websocket", get(realtime))
        .with_state(state)
}

async fn preflight(State(state): State<MockState>) -> impl IntoResponse {
    state.calls.lock().await.push("preflight".into());
    Json(json!(PREFLIGHT_ID))
}

async fn spawn(State(state): State<MockState>, Path(count): Path<u32>) -> impl IntoResponse {
    state.calls.lock().await.push(format!("spawn/{count}"));
    let mut next = state.next_voter.lock().await;
    let mut voters = state.voters.lock().await;
    for _ in 0..count {
        *next += 1;
        let n = f64::from(*next);
        voters.push(json!({
            "id": format!("sim-{}", *next),
            "is_simulated": true,
            "simulation": {"coordinates": [n, -n], "tolerance": 2.5}
        }));
    }
    Json(json!({"spawned": count}))
}

async fn terminate_one(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    state.calls.lock().await.push(format!("terminate/{id}"));
    let mut voters = state.voters.lock().await;
    let before = voters.len();
    voters.retain(|voter| voter["id"] != json!(id));
    if voters.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!("no such voter"))).into_response();
    }
    Json(json!("terminated")).into_response()
}

async fn terminate_all(State(state): State<MockState>) -> impl IntoResponse {
    state.calls.lock().await.push("terminate".into());
    state.voters.lock().await.clear();
    StatusCode::NO_CONTENT
}

async fn refresh(State(state): State<MockState>) -> impl IntoResponse {
    state.calls.lock().await.push("refresh".into());
    let voters = state.voters.lock().await.clone();
    Json(json!({ "voters": voters }))
}

async fn realtime(
    ws: WebSocketUpgrade,
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.socket_queries.lock().await.push(query);
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn reply(frame: &[Value], status: &str, response: Value) -> WsMessage {
    WsMessage::Text(
        json!([
            frame[0],
            frame[1],
            frame[2],
            "phx_reply",
            {"status": status, "response": response}
        ])
        .to_string(),
    )
}

async fn handle_socket(socket: WebSocket, state: MockState) {
    let (mut sink, mut stream) = socket.split();
    while let Some(Ok(message)) = stream.next().await {
        let WsMessage::Text(text) = message else {
            continue;
        };
        let frame: Vec<Value> = match serde_json::from_str(&text) {
            Ok(frame) => frame,
            Err(_) => continue,
        };
        if frame.len() != 5 {
            continue;
        }
        let topic = frame[2].as_str().unwrap_or_default().to_string();
        let event = frame[3].as_str().unwrap_or_default().to_string();
        let payload = frame[4].clone();
        debug!(%topic, %event, "mock received");
        state
            .pushes
            .lock()
            .await
            .push((topic.clone(), event.clone(), payload.clone()));

        let out = match event.as_str() {
            "heartbeat" | "phx_leave" => Some(reply(&frame, "ok", json!({}))),
            "phx_join" if topic == REJECTED_TOPIC => {
                Some(reply(&frame, "error", json!({"reason": "unauthorized"})))
            }
            "phx_join" => Some(reply(&frame, "ok", json!({}))),
            "join_network" => Some(reply(&frame, "ok", json!("joined"))),
            "leave_network" => Some(reply(&frame, "ok", json!("left"))),
            "get_history" => Some(reply(
                &frame,
                "ok",
                json!([{
                    "timestamp": 1_700_000_000,
                    "outcome": ["accepted"],
                    "policy": ["policy", [2, 3], "Public transit", null]
                }]),
            )),
            "propose" => match payload["description"].as_str() {
                Some(REJECTED_POLICY) => Some(reply(&frame, "error", json!("no quorum"))),
                Some(IGNORED_POLICY) => None,
                _ => Some(reply(&frame, "ok", json!({"ballot": 1}))),
            },
            HANG_UP => break,
            _ => Some(reply(&frame, "error", json!({"reason": "unmatched topic"}))),
        };
        if let Some(out) = out {
            if sink.send(out).await.is_err() {
                break;
            }
        }
    }
}
