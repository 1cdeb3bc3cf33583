//! Peer registry and longest-valid-chain consensus.
//!
//! The registry is pure in-process state; fetching a peer's chain over the
//! network is abstracted behind [`ChainFetcher`] so this module stays
//! runtime-agnostic. `ember-network` supplies the `reqwest`-based adapter
//! that implements it.

use std::collections::BTreeSet;

use url::Url;

use crate::types::Chain;
use crate::validate;

/// A set of registered peer base URLs, each canonicalized to
/// `scheme://host:port`. Membership is monotonic — there is no removal
/// operation.
#[derive(Debug, Clone, Default)]
pub struct PeerRegistry {
    peers: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes `url` to `scheme://host[:port]` and inserts it. Duplicate
    /// inserts are idempotent. Malformed URLs are rejected.
    pub fn register(&mut self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let scheme = parsed.scheme();
        let host = parsed.host_str()?;
        let canonical = match parsed.port() {
            Some(port) => format!("{scheme}://{host}:{port}"),
            None => format!("{scheme}://{host}"),
        };
        self.peers.insert(canonical.clone());
        Some(canonical)
    }

    pub fn list(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Fetches a peer's reported chain. Implemented over HTTP by `ember-network`;
/// kept as a trait here so consensus sweeping stays testable without a
/// network stack.
pub trait ChainFetcher {
    /// Returns `(reported_length, chain)` on success, `None` on any failure
    /// (unreachable peer, non-success status, malformed body).
    fn fetch_chain(&self, peer_base_url: &str) -> Option<(usize, Chain)>;

    /// Best-effort notification that a new block was mined; failures are
    /// silently ignored.
    fn notify_resolve(&self, _peer_base_url: &str) {}
}

/// Outcome of a consensus sweep.
pub struct ResolveOutcome {
    pub replaced: bool,
    pub chain: Chain,
}

/// Runs the longest-valid-chain sweep against every registered peer.
///
/// `max_length` starts at `local_chain.len()` so adoption requires strict
/// improvement; the first peer chain that beats the running maximum and
/// passes validation becomes the new best, and the maximum is raised so
/// later peers must beat *that*. Peers that fail to respond or whose chain
/// fails validation are skipped and the sweep continues — neither case is
/// surfaced to the caller as an error.
pub fn resolve_conflicts(local_chain: &Chain, peers: &PeerRegistry, difficulty: u32, fetcher: &dyn ChainFetcher) -> ResolveOutcome {
    let mut max_length = local_chain.len();
    let mut best: Option<Chain> = None;

    for peer in peers.list() {
        let Some((length, chain)) = fetcher.fetch_chain(&peer) else {
            continue;
        };
        if length > max_length && validate::is_chain_valid(&chain, difficulty) {
            max_length = length;
            best = Some(chain);
        }
    }

    match best {
        Some(chain) => ResolveOutcome { replaced: true, chain },
        None => ResolveOutcome { replaced: false, chain: local_chain.clone() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{genesis_block, mine_block};

    struct StubFetcher {
        responses: std::collections::HashMap<String, (usize, Chain)>,
    }

    impl ChainFetcher for StubFetcher {
        fn fetch_chain(&self, peer_base_url: &str) -> Option<(usize, Chain)> {
            self.responses.get(peer_base_url).cloned()
        }
    }

    fn chain_of_len(n: usize) -> Chain {
        let mut chain = vec![genesis_block(1_700_000_000.0)];
        for i in 1..n {
            let prev_hash = chain.last().unwrap().hash.clone();
            chain.push(mine_block(i as u64, prev_hash, vec![], 1_700_000_000.0 + i as f64, 0));
        }
        chain
    }

    #[test]
    fn register_normalizes_to_scheme_host_port() {
        let mut registry = PeerRegistry::new();
        let canonical = registry.register("http://example.com:5000/chain?x=1#frag").unwrap();
        assert_eq!(canonical, "http://example.com:5000");
        registry.register("http://example.com:5000/other");
        assert_eq!(registry.len(), 1);
    }

    /// P7: a peer chain no longer than local is never adopted.
    #[test]
    fn shorter_or_equal_peer_chain_is_rejected() {
        let local = chain_of_len(3);
        let mut registry = PeerRegistry::new();
        registry.register("http://peer:5000");

        let mut responses = std::collections::HashMap::new();
        responses.insert("http://peer:5000".to_string(), (3, chain_of_len(3)));
        let fetcher = StubFetcher { responses };

        let outcome = resolve_conflicts(&local, &registry, 0, &fetcher);
        assert!(!outcome.replaced);
        assert_eq!(outcome.chain.len(), 3);
    }

    /// P8: an invalid longer chain is never adopted.
    #[test]
    fn invalid_longer_peer_chain_is_rejected() {
        let local = chain_of_len(3);
        let mut registry = PeerRegistry::new();
        registry.register("http://peer:5000");

        let mut tampered = chain_of_len(5);
        tampered[3].nonce = tampered[3].nonce.wrapping_add(1);

        let mut responses = std::collections::HashMap::new();
        responses.insert("http://peer:5000".to_string(), (5, tampered));
        let fetcher = StubFetcher { responses };

        let outcome = resolve_conflicts(&local, &registry, 0, &fetcher);
        assert!(!outcome.replaced);
        assert_eq!(outcome.chain.len(), 3);
    }

    #[test]
    fn longer_valid_peer_chain_is_adopted() {
        let local = chain_of_len(3);
        let mut registry = PeerRegistry::new();
        registry.register("http://peer:5000");

        let mut responses = std::collections::HashMap::new();
        responses.insert("http://peer:5000".to_string(), (4, chain_of_len(4)));
        let fetcher = StubFetcher { responses };

        let outcome = resolve_conflicts(&local, &registry, 0, &fetcher);
        assert!(outcome.replaced);
        assert_eq!(outcome.chain.len(), 4);
    }

    #[test]
    fn unreachable_peer_is_skipped() {
        let local = chain_of_len(3);
        let mut registry = PeerRegistry::new();
        registry.register("http://peer:5000");

        let fetcher = StubFetcher { responses: std::collections::HashMap::new() };
        let outcome = resolve_conflicts(&local, &registry, 0, &fetcher);
        assert!(!outcome.replaced);
    }
}
