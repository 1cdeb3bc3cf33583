use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use ember_core::error::Error;
use ember_core::types::TxRecord;
use serde::{Deserialize, Serialize};

use crate::state::SharedState;
use crate::time::unix_timestamp;

#[derive(Debug, Deserialize)]
pub struct MineQuery {
    pub miner_address: Option<String>,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub hash: String,
    pub previous_hash: String,
    pub nonce: u64,
    pub transactions: Vec<TxRecord>,
}

#[derive(Serialize)]
pub struct MessageOnly {
    pub message: String,
}

/// `GET /mine?miner_address=<hex>`
///
/// The ledger lock is held only to snapshot the pool/tip and, once the
/// search finishes, to validate and append the result — never across the
/// proof-of-work search itself, which runs on a blocking thread with the
/// lock released. A concurrent `/nodes/resolve` (or another `/mine`) that
/// moves the tip in between is detected on re-acquire and the candidate is
/// discarded as an `AppendConflict`, not silently appended over a stale tip.
pub async fn mine(
    State(state): State<SharedState>,
    Query(query): Query<MineQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let timestamp = unix_timestamp();

    let job = {
        let mut node = state.node.lock().expect("node mutex is never poisoned");
        node.begin_mine(query.miner_address.as_deref(), timestamp)
    };
    let job = match job {
        Ok(job) => job,
        Err(Error::NothingToMine) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    serde_json::to_value(MessageOnly { message: "No transactions to mine".to_string() })
                        .expect("response always serializes"),
                ),
            );
        }
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    serde_json::to_value(MessageOnly { message: "Failed to add block".to_string() })
                        .expect("response always serializes"),
                ),
            );
        }
    };

    let outcome = tokio::task::spawn_blocking(move || {
        let block = job.search();
        let mut node = state.node.lock().expect("node mutex is never poisoned");
        let result = node.finish_mine(job, block);
        if result.is_ok() {
            node.notify_peers(&state.fetcher);
        }
        result
    })
    .await
    .expect("mining task panicked");

    match outcome {
        Ok(outcome) => {
            let body = MineResponse {
                message: "Block mined".to_string(),
                index: outcome.block.index,
                hash: outcome.block.hash,
                previous_hash: outcome.block.previous_hash,
                nonce: outcome.block.nonce,
                transactions: outcome.block.transactions,
            };
            (StatusCode::OK, Json(serde_json::to_value(body).expect("response always serializes")))
        }
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(
                serde_json::to_value(MessageOnly { message: "Failed to add block".to_string() })
                    .expect("response always serializes"),
            ),
        ),
    }
}
