//! `ember-node`: the HTTP-facing binary for a single chain node.
//!
//! Exposes the wallet, transaction, mining, chain, and peer-consensus
//! endpoints over JSON, backed by an in-process [`ember_core::node::Node`].

mod config;
mod routes;
mod state;
mod time;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use ember_network::HttpChainFetcher;
use tokio::signal;

use config::ApiConfig;
use state::{AppState, SharedState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "ember_rpc=info,ember_core=info".to_string()))
        .init();

    if let Err(err) = run().await {
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let api_config = ApiConfig::default();
    let consensus_config = config::consensus_config_from_env();

    let node = ember_core::node::Node::new(consensus_config, time::unix_timestamp());
    let fetcher = HttpChainFetcher::new(Duration::from_secs(2));

    let app_state: SharedState = Arc::new(AppState { node: Mutex::new(node), fetcher });

    let app = Router::new()
        .route("/wallet/new", get(routes::wallet::wallet_new))
        .route("/transaction/new", post(routes::transaction::transaction_new))
        .route("/mine", get(routes::mine::mine))
        .route("/chain", get(routes::chain::chain))
        .route("/pending", get(routes::pending::pending))
        .route("/balance/{address}", get(routes::balance::balance))
        .route("/nodes/register", post(routes::nodes::register))
        .route("/nodes", get(routes::nodes::list))
        .route("/nodes/resolve", get(routes::nodes::resolve))
        .with_state(app_state);

    tracing::info!("ember-node listening on http://{}", api_config.listen_addr);

    let listener = tokio::net::TcpListener::bind(api_config.listen_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", api_config.listen_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("HTTP server error: {e}"))?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
