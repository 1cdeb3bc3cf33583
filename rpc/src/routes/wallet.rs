use axum::{Json, http::StatusCode};
use ember_wallet::Wallet;
use serde::Serialize;

#[derive(Serialize)]
pub struct WalletNewResponse {
    pub private_key: String,
    pub public_key: String,
    pub address: String,
}

/// `GET /wallet/new`
///
/// Generates a fresh keypair and hands it back once. The node never stores
/// it — the caller is responsible for holding onto the private key.
pub async fn wallet_new() -> (StatusCode, Json<WalletNewResponse>) {
    let wallet = Wallet::generate();
    (
        StatusCode::OK,
        Json(WalletNewResponse {
            private_key: wallet.private_key_hex(),
            public_key: wallet.public_key_hex(),
            address: wallet.address().to_string(),
        }),
    )
}
