//! Node process configuration: the HTTP listen address and the consensus
//! [`Config`](ember_core::config::Config), both overridable via environment
//! variables.

use std::net::SocketAddr;

use ember_core::config::ConfigBuilder;
use ember_core::types::Amount;

/// Configuration for the `ember-node` HTTP server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let addr = std::env::var("EMBER_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let listen_addr = addr.parse().unwrap_or_else(|_| {
            "0.0.0.0:5000".parse().expect("hard-coded fallback listen address always parses")
        });
        Self { listen_addr }
    }
}

/// Builds the node's consensus configuration from environment overrides,
/// falling back to [`ember_core::config::Config::default`] for anything unset.
pub fn consensus_config_from_env() -> ember_core::config::Config {
    let mut builder = ConfigBuilder::new();

    if let Some(difficulty) = env_parsed::<u32>("EMBER_DIFFICULTY") {
        builder = builder.difficulty(difficulty);
    }
    if let Ok(raw_reward) = std::env::var("EMBER_BLOCK_REWARD") {
        if let Some(reward) = Amount::parse_numeral(&raw_reward) {
            builder = builder.block_reward(reward);
        }
    }
    if let Ok(network) = std::env::var("EMBER_NETWORK") {
        builder = builder.network(network);
    }

    builder.finish()
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
