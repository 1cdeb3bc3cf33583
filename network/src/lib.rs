//! HTTP transport for peer-to-peer chain exchange.
//!
//! `ember-core`'s consensus sweep is defined against the
//! [`ember_core::peers::ChainFetcher`] trait so it never depends on a
//! network stack directly; this crate supplies the one adapter that talks
//! to real peers, over blocking `reqwest` calls against their `/chain` and
//! `/nodes/resolve` endpoints.

use std::time::Duration;

use ember_core::peers::ChainFetcher;
use ember_core::types::{Block, Chain};
use serde::Deserialize;
use tracing::warn;

#[derive(Deserialize)]
struct ChainResponse {
    length: usize,
    chain: Vec<Block>,
}

/// A [`ChainFetcher`] backed by a blocking `reqwest` client with a
/// fixed per-request timeout.
pub struct HttpChainFetcher {
    client: reqwest::blocking::Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client with a fixed timeout always builds");
        Self { client }
    }
}

impl ChainFetcher for HttpChainFetcher {
    fn fetch_chain(&self, peer_base_url: &str) -> Option<(usize, Chain)> {
        let url = format!("{peer_base_url}/chain");
        let response = self.client.get(&url).send().ok()?;
        if !response.status().is_success() {
            warn!(peer = peer_base_url, status = %response.status(), "peer returned non-success status");
            return None;
        }
        let body: ChainResponse = response.json().ok()?;
        Some((body.length, body.chain))
    }

    fn notify_resolve(&self, peer_base_url: &str) {
        let url = format!("{peer_base_url}/nodes/resolve");
        if let Err(err) = self.client.get(&url).send() {
            warn!(peer = peer_base_url, error = %err, "failed to notify peer of new block");
        }
    }
}
