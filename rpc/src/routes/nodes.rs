use axum::{Json, extract::State, http::StatusCode};
use ember_core::types::Block;
use serde::{Deserialize, Serialize};

use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: usize,
}

#[derive(Serialize)]
pub struct MessageOnly {
    pub message: String,
}

/// `POST /nodes/register`
pub async fn register(
    State(state): State<SharedState>,
    Json(body): Json<RegisterNodesRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(urls) = body.nodes else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::to_value(MessageOnly { message: "Please supply a list of nodes".to_string() }).unwrap()),
        );
    };

    let mut node = state.node.lock().expect("node mutex is never poisoned");
    for url in &urls {
        node.register_peer(url);
    }
    let total_nodes = node.peer_list().len();

    (
        StatusCode::CREATED,
        Json(
            serde_json::to_value(RegisterNodesResponse { message: "New nodes have been added".to_string(), total_nodes })
                .unwrap(),
        ),
    )
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub nodes: Vec<String>,
}

/// `GET /nodes`
pub async fn list(State(state): State<SharedState>) -> (StatusCode, Json<NodesResponse>) {
    let node = state.node.lock().expect("node mutex is never poisoned");
    (StatusCode::OK, Json(NodesResponse { nodes: node.peer_list() }))
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: String,
    pub length: usize,
    pub chain: Vec<Block>,
}

/// `GET /nodes/resolve`
///
/// Runs the longest-valid-chain sweep on a blocking thread — it makes
/// outbound HTTP calls to every registered peer.
pub async fn resolve(State(state): State<SharedState>) -> (StatusCode, Json<ResolveResponse>) {
    let response = tokio::task::spawn_blocking(move || {
        let mut node = state.node.lock().expect("node mutex is never poisoned");
        let replaced = node.resolve_conflicts(&state.fetcher);
        let message = if replaced { "Our chain was replaced" } else { "Our chain is authoritative" };
        let chain = node.chain().clone();
        ResolveResponse { message: message.to_string(), length: chain.len(), chain }
    })
    .await
    .expect("resolve task panicked");

    (StatusCode::OK, Json(response))
}
