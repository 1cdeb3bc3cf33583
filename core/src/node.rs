//! Ledger state: the accepted chain, pool, and peer set behind one logical
//! owner, so a single lock can guard all three together.
//!
//! `Node` itself holds no lock; `ember-rpc` wraps it in
//! `Arc<AppState { node: std::sync::Mutex<Node>, .. }>`, the single shared
//! state struct every request handler locks against in turn (see
//! `ember-rpc`'s `state.rs` for why a plain `std::sync::Mutex` is used
//! instead of an async one). A long proof-of-work search does not hold that
//! lock for its duration: [`Node::begin_mine`] snapshots the pool and chain
//! tip under the lock, the caller runs [`MiningJob::search`] with the lock
//! released, and [`Node::finish_mine`] re-acquires it to validate and append.

use tracing::{info, warn};

use crate::block;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::peers::{ChainFetcher, PeerRegistry, resolve_conflicts};
use crate::pool::Pool;
use crate::types::{Amount, Block, Chain, RegularTx, TxRecord};
use crate::validate;

/// Result of a successful mine: the appended block and the emptied pool.
#[derive(Debug, PartialEq)]
pub struct MineOutcome {
    pub block: Block,
}

/// A mining candidate captured under the ledger lock: the chain tip and
/// pool snapshot to build against, and how many pool entries it includes.
///
/// Carries no reference to `Node` — [`MiningJob::search`] is a pure,
/// lock-free function of the job's own fields, so it can run on a blocking
/// thread while the ledger lock is held by nobody, and the result handed
/// back to [`Node::finish_mine`] once the search completes.
pub struct MiningJob {
    index: u64,
    previous_hash: String,
    transactions: Vec<TxRecord>,
    timestamp: f64,
    difficulty: u32,
    included: usize,
}

impl MiningJob {
    /// Runs the proof-of-work search. CPU-bound and unbounded; holds no
    /// lock of its own — call it outside the ledger mutex, then pass the
    /// resulting block to [`Node::finish_mine`].
    pub fn search(&self) -> Block {
        block::mine_block(self.index, self.previous_hash.clone(), self.transactions.clone(), self.timestamp, self.difficulty)
    }
}

pub struct Node {
    config: Config,
    chain: Chain,
    pool: Pool,
    peers: PeerRegistry,
}

impl Node {
    /// Creates a node with a fresh genesis block at the current time.
    pub fn new(config: Config, genesis_timestamp: f64) -> Self {
        Self {
            chain: vec![block::genesis_block(genesis_timestamp)],
            pool: Pool::new(),
            peers: PeerRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_valid(&self) -> bool {
        validate::is_chain_valid(&self.chain, self.config.difficulty)
    }

    pub fn pending(&self) -> Vec<TxRecord> {
        self.pool.snapshot()
    }

    pub fn balance(&self, address: &str) -> f64 {
        validate::balance_of(&self.chain, address)
    }

    /// Admits a client-submitted transaction.
    pub fn submit_transaction(
        &mut self,
        sender_pubkey_hex: &str,
        recipient_address: &str,
        amount: Amount,
        signature_hex: &str,
        timestamp: f64,
    ) -> Result<()> {
        self.pool.submit(sender_pubkey_hex, recipient_address, amount, signature_hex, timestamp)
    }

    pub fn register_peer(&mut self, url: &str) -> Option<String> {
        self.peers.register(url)
    }

    pub fn peer_list(&self) -> Vec<String> {
        self.peers.list()
    }

    /// Snapshots the pool and chain tip under the lock and returns a
    /// [`MiningJob`] to search against outside of it. Fails immediately,
    /// without touching the pool, if it is empty.
    ///
    /// The coinbase (if any) is appended only to the job's candidate
    /// transaction list, never to the real pool — so a transaction admitted
    /// while the search runs unlocked is never mistaken for already mined.
    pub fn begin_mine(&mut self, miner_address: Option<&str>, timestamp: f64) -> Result<MiningJob> {
        if self.pool.is_empty() {
            return Err(Error::NothingToMine);
        }

        let mut transactions = self.pool.snapshot();
        let included = transactions.len();
        if let Some(miner_address) = miner_address {
            transactions.push(TxRecord::Regular(RegularTx::coinbase(
                miner_address.to_string(),
                self.config.block_reward.clone(),
                timestamp,
            )));
        }

        let previous_hash = self.chain.last().expect("chain always has a genesis block").hash.clone();
        let index = self.chain.len() as u64;
        let difficulty = self.config.difficulty;

        Ok(MiningJob { index, previous_hash, transactions, timestamp, difficulty, included })
    }

    /// Validates and appends a block produced by [`MiningJob::search`].
    ///
    /// Fails with [`Error::AppendConflict`] — discarding only the candidate
    /// block, never the pool — if the chain tip moved since `begin_mine`
    /// (a concurrent consensus replacement, or another mine that finished
    /// first). On success, drains exactly the pool entries the job
    /// included, leaving any transaction admitted during the search intact.
    pub fn finish_mine(&mut self, job: MiningJob, block: Block) -> Result<MineOutcome> {
        let tip_unchanged = self.chain.last().map(|b| b.hash.as_str()) == Some(job.previous_hash.as_str());
        if tip_unchanged && block.previous_hash == job.previous_hash && block::is_valid_proof(&block, job.difficulty) {
            self.chain.push(block.clone());
            self.pool.clear_mined(job.included);
            info!(index = block.index, hash = %block.hash, "mined block");
            Ok(MineOutcome { block })
        } else {
            warn!("mine append conflict: chain tip moved during proof-of-work search");
            Err(Error::AppendConflict)
        }
    }

    /// Convenience wrapper for callers that hold the lock for the whole
    /// operation (tests, or any embedding that doesn't need concurrent
    /// access during the search). Equivalent to `begin_mine` +
    /// [`MiningJob::search`] + `finish_mine` run back to back.
    pub fn mine(&mut self, miner_address: Option<&str>, timestamp: f64) -> Result<MineOutcome> {
        let job = self.begin_mine(miner_address, timestamp)?;
        let block = job.search();
        self.finish_mine(job, block)
    }

    /// Runs the longest-valid-chain sweep against every registered peer.
    /// The pool is intentionally left untouched across a reorg — pending
    /// transactions survive and may be replayed by a later mine.
    pub fn resolve_conflicts(&mut self, fetcher: &dyn ChainFetcher) -> bool {
        let outcome = resolve_conflicts(&self.chain, &self.peers, self.config.difficulty, fetcher);
        if outcome.replaced {
            self.chain = outcome.chain;
            info!(length = self.chain.len(), "chain replaced by consensus");
        }
        outcome.replaced
    }

    /// Fires a best-effort `/nodes/resolve` ping at every registered peer.
    /// Delivery failure is silently ignored.
    pub fn notify_peers(&self, fetcher: &dyn ChainFetcher) {
        for peer in self.peers.list() {
            fetcher.notify_resolve(&peer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon;
    use crate::crypto;
    use secp256k1::Secp256k1;

    fn keypair() -> (secp256k1::SecretKey, String) {
        let secp = Secp256k1::new();
        let (sk, pk) = secp.generate_keypair(&mut rand::rngs::OsRng);
        (sk, hex::encode(crypto::public_key_bytes(&pk)))
    }

    #[test]
    fn mine_with_empty_pool_is_nothing_to_mine() {
        let mut node = Node::new(Config { difficulty: 1, ..Config::default() }, 1_700_000_000.0);
        assert_eq!(node.mine(Some("miner"), 1_700_000_001.0), Err(Error::NothingToMine));
    }

    /// Concrete scenario 3: admit one valid tx, mine with a reward, chain
    /// grows to length 2 with 2 transactions, difficulty prefix holds, and
    /// the chain validates.
    #[test]
    fn mine_appends_block_with_transfer_and_coinbase() {
        let mut node = Node::new(Config { difficulty: 2, ..Config::default() }, 1_700_000_000.0);

        let (sk, pubkey_hex) = keypair();
        let sender_address = crypto::derive_address_from_hex(&pubkey_hex).unwrap();
        let amount = Amount::from_u64(10);
        let timestamp = 1_700_000_001.0;
        let preimage = canon::signing_preimage(&sender_address, "bob-addr", &amount, timestamp);
        let signature = crypto::sign(&sk, &preimage);

        node.submit_transaction(&pubkey_hex, "bob-addr", amount, &signature, timestamp).unwrap();

        let outcome = node.mine(Some("miner-addr"), 1_700_000_002.0).unwrap();
        assert_eq!(node.chain_len(), 2);
        assert_eq!(outcome.block.transactions.len(), 2);
        assert!(outcome.block.hash.starts_with("00"));
        assert!(node.is_valid());
        assert!(node.pending().is_empty());
    }

    /// P9: after a successful mine the pool is empty.
    #[test]
    fn pool_is_empty_after_successful_mine() {
        let mut node = Node::new(Config { difficulty: 1, ..Config::default() }, 1_700_000_000.0);
        let (sk, pubkey_hex) = keypair();
        let sender_address = crypto::derive_address_from_hex(&pubkey_hex).unwrap();
        let amount = Amount::from_u64(1);
        let timestamp = 1_700_000_001.0;
        let preimage = canon::signing_preimage(&sender_address, "bob-addr", &amount, timestamp);
        let signature = crypto::sign(&sk, &preimage);
        node.submit_transaction(&pubkey_hex, "bob-addr", amount, &signature, timestamp).unwrap();

        node.mine(None, 1_700_000_002.0).unwrap();
        assert!(node.pending().is_empty());
    }

    /// The append conflict a `begin_mine`/`finish_mine` split makes
    /// possible: the chain tip moves (here, standing in for a concurrent
    /// consensus replacement or a race against another mine) between
    /// snapshotting and appending. `finish_mine` must reject the stale
    /// candidate without touching the pool.
    #[test]
    fn finish_mine_rejects_a_stale_tip_and_leaves_the_pool_untouched() {
        let mut node = Node::new(Config { difficulty: 0, ..Config::default() }, 1_700_000_000.0);
        let (sk, pubkey_hex) = keypair();
        let sender_address = crypto::derive_address_from_hex(&pubkey_hex).unwrap();
        let amount = Amount::from_u64(1);
        let timestamp = 1_700_000_001.0;
        let preimage = canon::signing_preimage(&sender_address, "bob-addr", &amount, timestamp);
        let signature = crypto::sign(&sk, &preimage);
        node.submit_transaction(&pubkey_hex, "bob-addr", amount, &signature, timestamp).unwrap();

        let job = node.begin_mine(None, timestamp + 1.0).unwrap();
        let block = job.search();

        // Something else advances the chain tip while the search above was
        // (hypothetically) running unlocked.
        let intervening_index = node.chain_len() as u64;
        let intervening_prev = node.chain().last().unwrap().hash.clone();
        node.chain.push(block::mine_block(intervening_index, intervening_prev, vec![], timestamp + 0.5, 0));

        let result = node.finish_mine(job, block);
        assert!(matches!(result, Err(Error::AppendConflict)));
        assert_eq!(node.chain_len(), 2);
        assert_eq!(node.pending().len(), 1);
    }
}
