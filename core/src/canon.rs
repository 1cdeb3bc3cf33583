//! Canonical encoder: the single source of truth for block hashing and
//! transaction signing preimages.
//!
//! Both derive from the same rule set: object keys sorted lexicographically,
//! no insignificant whitespace, and numbers round-tripped in their shortest
//! exact form. This is achieved for free by building a
//! `serde_json::Map<String, Value>` (backed by a `BTreeMap` as long as the
//! `preserve_order` feature is not enabled) and serializing it with
//! `serde_json::to_vec`, whose float formatter (`ryu`) already produces a
//! shortest round-tripping decimal. Any implementation that does not
//! reproduce this byte-for-byte breaks consensus across nodes.

use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};

use crate::types::{Amount, Block, RegularTx, TxRecord};

/// Returns the lowercase hex SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(digest)
}

fn timestamp_value(timestamp: f64) -> Value {
    Value::Number(Number::from_f64(timestamp).expect("timestamp must be finite"))
}

fn amount_value(amount: &Amount) -> Value {
    serde_json::to_value(amount).expect("amount is always representable as JSON")
}

/// Encodes a single transaction-list element exactly as it would appear
/// inside a block's `transactions` array.
pub fn tx_record_value(tx: &TxRecord) -> Value {
    match tx {
        TxRecord::Genesis => Value::String(crate::types::GENESIS_SENTINEL.to_string()),
        TxRecord::Regular(tx) => regular_tx_value(tx),
    }
}

fn regular_tx_value(tx: &RegularTx) -> Value {
    let mut map = Map::new();
    map.insert("sender_address".into(), Value::String(tx.sender_address.clone()));
    map.insert(
        "sender_pubkey".into(),
        tx.sender_pubkey.clone().map(Value::String).unwrap_or(Value::Null),
    );
    map.insert("recipient_address".into(), Value::String(tx.recipient_address.clone()));
    map.insert("amount".into(), amount_value(&tx.amount));
    map.insert("timestamp".into(), timestamp_value(tx.timestamp));
    map.insert(
        "signature".into(),
        tx.signature.clone().map(Value::String).unwrap_or(Value::Null),
    );
    Value::Object(map)
}

/// Builds the transaction-signing preimage: `{amount, recipient, sender,
/// timestamp}`, where `sender` is the sender's *address*, never its public
/// key. Signature and pubkey fields are never part of what is signed.
pub fn signing_preimage(sender_address: &str, recipient_address: &str, amount: &Amount, timestamp: f64) -> Vec<u8> {
    let mut map = Map::new();
    map.insert("amount".into(), amount_value(amount));
    map.insert("recipient".into(), Value::String(recipient_address.to_string()));
    map.insert("sender".into(), Value::String(sender_address.to_string()));
    map.insert("timestamp".into(), timestamp_value(timestamp));
    serde_json::to_vec(&Value::Object(map)).expect("canonical encoding never fails")
}

/// Builds the block hash preimage: `{index, nonce, previous_hash, timestamp,
/// transactions}`. The stored `hash` field is excluded by construction.
pub fn block_preimage(
    index: u64,
    nonce: u64,
    previous_hash: &str,
    timestamp: f64,
    transactions: &[TxRecord],
) -> Vec<u8> {
    let mut map = Map::new();
    map.insert("index".into(), Value::Number(Number::from(index)));
    map.insert("nonce".into(), Value::Number(Number::from(nonce)));
    map.insert("previous_hash".into(), Value::String(previous_hash.to_string()));
    map.insert("timestamp".into(), timestamp_value(timestamp));
    map.insert(
        "transactions".into(),
        Value::Array(transactions.iter().map(tx_record_value).collect()),
    );
    serde_json::to_vec(&Value::Object(map)).expect("canonical encoding never fails")
}

/// Recomputes the canonical hash of `block` from its stored fields
/// (excluding the stored `hash` itself).
pub fn recompute_block_hash(block: &Block) -> String {
    let preimage = block_preimage(
        block.index,
        block.nonce,
        &block.previous_hash,
        block.timestamp,
        &block.transactions,
    );
    sha256_hex(&preimage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TxRecord;

    /// Conformance vector from spec scenario 1: a fixed-timestamp genesis
    /// block preimage, byte-identical across independent implementations.
    #[test]
    fn genesis_preimage_matches_literal_vector() {
        let preimage = block_preimage(0, 0, "0", 1_700_000_000.0, &[TxRecord::Genesis]);
        let expected = br#"{"index":0,"nonce":0,"previous_hash":"0","timestamp":1700000000.0,"transactions":["Genesis Block"]}"#;
        assert_eq!(preimage, expected);
    }

    #[test]
    fn genesis_preimage_hash_is_deterministic() {
        let preimage = block_preimage(0, 0, "0", 1_700_000_000.0, &[TxRecord::Genesis]);
        let hash_a = sha256_hex(&preimage);
        let hash_b = sha256_hex(&preimage);
        assert_eq!(hash_a, hash_b);
        assert_eq!(hash_a.len(), 64);
    }

    /// Conformance vector from spec scenario 2: signing preimage with an
    /// integral amount (no decimal point) and a fractional timestamp.
    #[test]
    fn signing_preimage_matches_literal_vector() {
        let preimage = signing_preimage("aa", "bb", &Amount::from_u64(10), 1_700_000_001.0);
        let expected = br#"{"amount":10,"recipient":"bb","sender":"aa","timestamp":1700000001.0}"#;
        assert_eq!(preimage, expected);
    }

    #[test]
    fn coinbase_tx_value_includes_null_fields() {
        let tx = RegularTx::coinbase("miner-addr".into(), Amount::from_u64(1), 5.0);
        let value = regular_tx_value(&tx);
        assert_eq!(value["sender_pubkey"], Value::Null);
        assert_eq!(value["signature"], Value::Null);
        assert_eq!(value["sender_address"], Value::String("NETWORK".into()));
    }
}
