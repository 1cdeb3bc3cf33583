use axum::{Json, extract::{Path, State}, http::StatusCode};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub balance: f64,
}

/// `GET /balance/<address>`
pub async fn balance(State(state): State<SharedState>, Path(address): Path<String>) -> (StatusCode, Json<BalanceResponse>) {
    let node = state.node.lock().expect("node mutex is never poisoned");
    let balance = node.balance(&address);
    (StatusCode::OK, Json(BalanceResponse { address, balance }))
}
