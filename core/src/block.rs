//! Block engine: candidate construction and the proof-of-work search.
//!
//! The search loop is single-threaded and unbounded: nonce 0, 1, 2, ...
//! until the hash meets the configured difficulty. Parallelizing the
//! search is a natural extension but would change which nonce wins, so it
//! is left as-is here.

use crate::canon;
use crate::pow;
use crate::types::{Block, TxRecord};

/// Builds the genesis block: index 0, sole transaction the literal
/// `"Genesis Block"`, `previous_hash = "0"`, `nonce = 0`.
pub fn genesis_block(timestamp: f64) -> Block {
    let transactions = vec![TxRecord::Genesis];
    let preimage = canon::block_preimage(0, 0, "0", timestamp, &transactions);
    let hash = canon::sha256_hex(&preimage);
    Block {
        index: 0,
        timestamp,
        previous_hash: "0".to_string(),
        hash,
        nonce: 0,
        transactions,
    }
}

/// Runs the PoW search starting from `nonce = 0`, incrementing until the
/// recomputed hash satisfies `difficulty`, then returns the finished block.
pub fn mine_block(index: u64, previous_hash: String, transactions: Vec<TxRecord>, timestamp: f64, difficulty: u32) -> Block {
    let mut nonce = 0u64;
    loop {
        let preimage = canon::block_preimage(index, nonce, &previous_hash, timestamp, &transactions);
        let hash = canon::sha256_hex(&preimage);
        if pow::hash_meets_difficulty(&hash, difficulty) {
            return Block {
                index,
                timestamp,
                previous_hash,
                hash,
                nonce,
                transactions,
            };
        }
        nonce += 1;
    }
}

/// Re-validates a mined block's proof: difficulty prefix and a hash that
/// matches the recomputation from stored fields.
pub fn is_valid_proof(block: &Block, difficulty: u32) -> bool {
    pow::hash_meets_difficulty(&block.hash, difficulty) && block.hash == canon::recompute_block_hash(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mining_produces_a_block_meeting_difficulty() {
        let block = mine_block(1, "0".repeat(64), vec![], 1_700_000_000.0, 2);
        assert!(pow::hash_meets_difficulty(&block.hash, 2));
        assert!(is_valid_proof(&block, 2));
    }

    #[test]
    fn genesis_block_has_expected_shape() {
        let genesis = genesis_block(1_700_000_000.0);
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, "0");
        assert_eq!(genesis.nonce, 0);
        assert_eq!(genesis.transactions.len(), 1);
        assert_eq!(genesis.hash.len(), 64);
    }
}
