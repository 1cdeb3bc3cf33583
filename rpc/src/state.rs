//! Shared application state: one logical mutex guarding the node's chain,
//! pool, and peer set together, and the HTTP peer-fetch client used by
//! consensus and mine-notification.
//!
//! A plain [`std::sync::Mutex`] is used rather than `tokio::sync::Mutex`:
//! both the proof-of-work search and outbound peer HTTP calls are
//! CPU/IO-blocking, so handlers that touch them run the whole critical
//! section inside [`tokio::task::spawn_blocking`] rather than holding an
//! async lock across an await point.

use std::sync::{Arc, Mutex};

use ember_core::node::Node;
use ember_network::HttpChainFetcher;

pub struct AppState {
    pub node: Mutex<Node>,
    pub fetcher: HttpChainFetcher,
}

/// Thread-safe alias for `AppState`, passed to handlers via axum's `State`.
pub type SharedState = Arc<AppState>;
