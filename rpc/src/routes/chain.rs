use axum::{Json, extract::State, http::StatusCode};
use ember_core::types::Block;
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
    pub valid: bool,
}

/// `GET /chain`
pub async fn chain(State(state): State<SharedState>) -> (StatusCode, Json<ChainResponse>) {
    let node = state.node.lock().expect("node mutex is never poisoned");
    let chain = node.chain().clone();
    let valid = node.is_valid();
    (StatusCode::OK, Json(ChainResponse { length: chain.len(), chain, valid }))
}
