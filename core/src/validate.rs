//! Whole-chain validation.
//!
//! Walks blocks `1..n`, checking the link, recomputed hash, difficulty
//! prefix, and every transaction's signature. Any failure is fatal for the
//! whole chain — validation returns `false` and the caller rejects the
//! candidate atomically; nothing is partially adopted.

use crate::canon;
use crate::crypto;
use crate::pow;
use crate::types::{Block, Chain, NETWORK_SENDER, TxRecord};

/// Returns `true` iff every block in `chain` links to its predecessor,
/// rehashes to its stored hash, meets `difficulty`, and carries only
/// transactions with a valid signature.
///
/// Block 0 is not structurally re-validated beyond being present — genesis
/// is trusted as the chain's root by construction.
pub fn is_chain_valid(chain: &Chain, difficulty: u32) -> bool {
    if chain.is_empty() {
        return false;
    }

    for i in 1..chain.len() {
        let prev = &chain[i - 1];
        let curr = &chain[i];

        // I1: link.
        if curr.previous_hash != prev.hash {
            return false;
        }

        // I2: integrity.
        if curr.hash != canon::recompute_block_hash(curr) {
            return false;
        }

        // I3: difficulty.
        if !pow::hash_meets_difficulty(&curr.hash, difficulty) {
            return false;
        }

        if !transactions_valid(curr) {
            return false;
        }
    }

    true
}

fn transactions_valid(block: &Block) -> bool {
    for tx in &block.transactions {
        match tx {
            // The sentinel is only meaningful at index 0; elsewhere it is
            // treated as opaque and skips signature checking.
            TxRecord::Genesis => continue,
            TxRecord::Regular(tx) => {
                if tx.sender_address == NETWORK_SENDER {
                    continue;
                }
                let Some(pubkey_hex) = tx.sender_pubkey.as_deref() else {
                    return false;
                };
                let Some(signature_hex) = tx.signature.as_deref() else {
                    return false;
                };
                let preimage =
                    canon::signing_preimage(&tx.sender_address, &tx.recipient_address, &tx.amount, tx.timestamp);
                if !crypto::verify(pubkey_hex, &preimage, signature_hex) {
                    return false;
                }
            }
        }
    }
    true
}

/// Derives a balance for `address` by replaying the whole chain: the sum of
/// amounts received minus the sum of amounts sent, skipping the genesis
/// sentinel. Negative balances are representable — no guard.
pub fn balance_of(chain: &Chain, address: &str) -> f64 {
    let mut balance = 0.0;
    for block in chain {
        if block.index == 0 {
            continue;
        }
        for tx in &block.transactions {
            let TxRecord::Regular(tx) = tx else {
                continue;
            };
            if tx.sender_address == address {
                balance -= tx.amount.as_f64();
            }
            if tx.recipient_address == address {
                balance += tx.amount.as_f64();
            }
        }
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{genesis_block, mine_block};
    use crate::types::{Amount, RegularTx};
    use secp256k1::Secp256k1;

    fn keypair() -> (secp256k1::SecretKey, String) {
        let secp = Secp256k1::new();
        let (sk, pk) = secp.generate_keypair(&mut rand::rngs::OsRng);
        (sk, hex::encode(crypto::public_key_bytes(&pk)))
    }

    #[test]
    fn genesis_alone_is_valid() {
        let chain = vec![genesis_block(1_700_000_000.0)];
        assert!(is_chain_valid(&chain, 0));
    }

    #[test]
    fn mined_chain_with_signed_transfer_validates() {
        let (sk, pubkey_hex) = keypair();
        let sender_address = crypto::derive_address_from_hex(&pubkey_hex).unwrap();
        let amount = Amount::from_u64(10);
        let timestamp = 1_700_000_001.0;
        let preimage = canon::signing_preimage(&sender_address, "bob-addr", &amount, timestamp);
        let signature = crypto::sign(&sk, &preimage);

        let transfer = TxRecord::Regular(RegularTx {
            sender_address,
            sender_pubkey: Some(pubkey_hex),
            recipient_address: "bob-addr".into(),
            amount,
            timestamp,
            signature: Some(signature),
        });

        let genesis = genesis_block(1_700_000_000.0);
        let block = mine_block(1, genesis.hash.clone(), vec![transfer], 1_700_000_002.0, 2);

        let chain = vec![genesis, block];
        assert!(is_chain_valid(&chain, 2));
    }

    /// P2: flipping any single byte of a stored field invalidates the chain.
    #[test]
    fn tampering_with_a_field_invalidates_chain() {
        let genesis = genesis_block(1_700_000_000.0);
        let mut block = mine_block(1, genesis.hash.clone(), vec![], 1_700_000_002.0, 1);
        block.nonce = block.nonce.wrapping_add(1);

        let chain = vec![genesis, block];
        assert!(!is_chain_valid(&chain, 1));
    }

    #[test]
    fn balance_reflects_sent_and_received_amounts() {
        let (sk, pubkey_hex) = keypair();
        let sender_address = crypto::derive_address_from_hex(&pubkey_hex).unwrap();
        let amount = Amount::from_u64(10);
        let timestamp = 1_700_000_001.0;
        let preimage = canon::signing_preimage(&sender_address, "bob-addr", &amount, timestamp);
        let signature = crypto::sign(&sk, &preimage);

        let transfer = TxRecord::Regular(RegularTx {
            sender_address: sender_address.clone(),
            sender_pubkey: Some(pubkey_hex),
            recipient_address: "bob-addr".into(),
            amount,
            timestamp,
            signature: Some(signature),
        });

        let genesis = genesis_block(1_700_000_000.0);
        let block = mine_block(1, genesis.hash.clone(), vec![transfer], 1_700_000_002.0, 0);
        let chain = vec![genesis, block];

        assert_eq!(balance_of(&chain, "bob-addr"), 10.0);
        assert_eq!(balance_of(&chain, &sender_address), -10.0);
    }
}
