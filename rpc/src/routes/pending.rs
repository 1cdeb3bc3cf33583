use axum::{Json, extract::State, http::StatusCode};
use ember_core::types::TxRecord;

use crate::state::SharedState;

/// `GET /pending`
pub async fn pending(State(state): State<SharedState>) -> (StatusCode, Json<Vec<TxRecord>>) {
    let node = state.node.lock().expect("node mutex is never poisoned");
    (StatusCode::OK, Json(node.pending()))
}
