//! Consensus and runtime configuration for **Ember** core.
//!
//! [`Config`] centralises tunable parameters — difficulty, coinbase reward,
//! network name, and the peer-fetch timeout used during consensus. It is
//! constructed via [`ConfigBuilder`]'s fluent pattern so callers can override
//! only the fields they care about while keeping sensible defaults.
//!
//! ```
//! use ember_core::config::Config;
//!
//! let cfg = Config::default();
//! assert_eq!(cfg.difficulty, 3);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Amount;

/// Runtime configuration shared across the crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Number of leading `'0'` hex characters required in a valid block hash.
    pub difficulty: u32,

    /// Coinbase reward paid to the miner when a `miner_address` is supplied.
    ///
    /// Kept as an [`Amount`] rather than a bare `f64` so a whole-number
    /// reward serializes into the canonical preimage as the JSON integer a
    /// client would expect (`1`, not `1.0`) — see `canon`'s preimage rules.
    pub block_reward: Amount,

    /// Human-readable name identifying the network (e.g. "main", "test").
    pub network: String,

    /// Timeout applied to outbound peer chain fetches during consensus.
    pub peer_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: 3,
            block_reward: Amount::from_u64(1),
            network: "main".into(),
            peer_timeout: Duration::from_secs(2),
        }
    }
}

/// Fluent builder for [`Config`].
pub struct ConfigBuilder {
    inner: Config,
}

impl ConfigBuilder {
    /// Starts a new builder pre-populated with [`Config::default`].
    pub fn new() -> Self {
        Self { inner: Config::default() }
    }

    pub fn difficulty(mut self, difficulty: u32) -> Self {
        self.inner.difficulty = difficulty;
        self
    }

    pub fn block_reward(mut self, reward: Amount) -> Self {
        self.inner.block_reward = reward;
        self
    }

    pub fn network<S: Into<String>>(mut self, name: S) -> Self {
        self.inner.network = name.into();
        self
    }

    pub fn peer_timeout(mut self, timeout: Duration) -> Self {
        self.inner.peer_timeout = timeout;
        self
    }

    /// Consumes the builder, returning an immutable configuration value.
    pub fn finish(self) -> Config {
        self.inner
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
