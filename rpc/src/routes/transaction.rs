use axum::{Json, extract::State, http::StatusCode};
use ember_core::types::Amount;
use serde::{Deserialize, Serialize};

use crate::state::SharedState;

/// Request body for `POST /transaction/new`. Every field is required; a
/// missing one is reported as `MissingFields` rather than a generic
/// deserialization failure, so a caller omitting a key sees the same 400
/// shape as one submitting an invalid signature.
#[derive(Debug, Deserialize)]
pub struct TransactionNewRequest {
    pub sender_pubkey: Option<String>,
    pub recipient_address: Option<String>,
    pub amount: Option<Amount>,
    pub signature: Option<String>,
    pub timestamp: Option<f64>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /transaction/new`
pub async fn transaction_new(
    State(state): State<SharedState>,
    Json(body): Json<TransactionNewRequest>,
) -> (StatusCode, Json<MessageResponse>) {
    let (Some(sender_pubkey), Some(recipient_address), Some(amount), Some(signature), Some(timestamp)) =
        (body.sender_pubkey, body.recipient_address, body.amount, body.signature, body.timestamp)
    else {
        return (StatusCode::BAD_REQUEST, Json(MessageResponse { message: "Missing fields".to_string() }));
    };

    let mut node = state.node.lock().expect("node mutex is never poisoned");
    match node.submit_transaction(&sender_pubkey, &recipient_address, amount, &signature, timestamp) {
        Ok(()) => (StatusCode::CREATED, Json(MessageResponse { message: "Transaction added".to_string() })),
        Err(_) => (StatusCode::BAD_REQUEST, Json(MessageResponse { message: "Invalid signature".to_string() })),
    }
}
