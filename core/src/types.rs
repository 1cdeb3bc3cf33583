//! Canonical data model: transactions, blocks, and the chain they form.
//!
//! Regular transactions, the coinbase reward, and the genesis sentinel share
//! a single on-wire list ([`TxRecord`]). The enum carries a custom
//! `Serialize`/`Deserialize` impl so the flat shape observed on the wire
//! (a bare string for genesis, a plain object otherwise) survives untouched,
//! rather than adding an internal tag.

use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Sentinel transaction-list element marking the genesis block.
pub const GENESIS_SENTINEL: &str = "Genesis Block";

/// Sender address literal used by coinbase (block-reward) transactions.
pub const NETWORK_SENDER: &str = "NETWORK";

/// A transfer amount, preserved in whatever numeric form the client sent it.
///
/// Clients may submit a whole number (`"amount": 10`) or a fractional value
/// (`"amount": 2.5`); the canonical hash/signature preimage must reproduce
/// the exact JSON numeral the client used, so `Amount` wraps
/// [`serde_json::Number`] rather than normalising to `f64` up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Number);

impl Amount {
    /// Builds an amount from a non-fractional value; serializes without a
    /// decimal point (e.g. `10`).
    pub fn from_u64(value: u64) -> Self {
        Amount(Number::from(value))
    }

    /// Builds an amount from a fractional value; serializes with a decimal
    /// point even for whole numbers (e.g. `10.0`).
    pub fn from_f64(value: f64) -> Self {
        Number::from_f64(value).map(Amount).expect("amount must be finite")
    }

    /// Returns the amount as `f64`, for balance arithmetic.
    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().expect("numeric amount")
    }

    /// Parses a numeral the way a JSON document would, preserving whatever
    /// literal form the source used (`"1"` stays an integer, `"1.5"` stays a
    /// float) rather than normalising through `f64`. Used for configuration
    /// values — such as the coinbase reward — that must round-trip through
    /// the canonical preimage exactly as configured.
    pub fn parse_numeral(s: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(s).ok()? {
            Value::Number(n) => Some(Amount(n)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A regular or coinbase transaction in its on-wire shape.
///
/// `sender_pubkey` and `signature` are `None` for coinbase transactions
/// (`sender_address == "NETWORK"`) and always serialize as JSON `null`
/// rather than being omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularTx {
    pub sender_address: String,
    pub sender_pubkey: Option<String>,
    pub recipient_address: String,
    pub amount: Amount,
    pub timestamp: f64,
    pub signature: Option<String>,
}

impl RegularTx {
    /// A transaction is a coinbase/reward transaction iff its sender address
    /// is the literal `"NETWORK"`.
    pub fn is_coinbase(&self) -> bool {
        self.sender_address == NETWORK_SENDER
    }

    /// Builds the coinbase reward transaction appended by a miner.
    pub fn coinbase(recipient_address: String, amount: Amount, timestamp: f64) -> Self {
        Self {
            sender_address: NETWORK_SENDER.to_string(),
            sender_pubkey: None,
            recipient_address,
            amount,
            timestamp,
            signature: None,
        }
    }
}

/// One element of a block's transaction list: the genesis sentinel or a
/// (regular/coinbase) transaction record.
#[derive(Debug, Clone, PartialEq)]
pub enum TxRecord {
    /// The literal string `"Genesis Block"`, valid only as block 0's sole
    /// transaction-list element.
    Genesis,
    Regular(RegularTx),
}

impl TxRecord {
    pub fn as_regular(&self) -> Option<&RegularTx> {
        match self {
            TxRecord::Regular(tx) => Some(tx),
            TxRecord::Genesis => None,
        }
    }
}

impl Serialize for TxRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TxRecord::Genesis => serializer.serialize_str(GENESIS_SENTINEL),
            TxRecord::Regular(tx) => tx.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TxRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::String(s) if s == GENESIS_SENTINEL => Ok(TxRecord::Genesis),
            serde_json::Value::Object(_) => serde_json::from_value(value)
                .map(TxRecord::Regular)
                .map_err(DeError::custom),
            _ => Err(DeError::custom(
                "transaction-list element must be the genesis sentinel or a transaction object",
            )),
        }
    }
}

/// A block in its on-wire record shape: `index, timestamp, previous_hash,
/// hash, nonce, transactions`. This is the single internal representation
/// used everywhere — consensus never distinguishes a locally-built block
/// from a peer-decoded one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64,
    pub previous_hash: String,
    pub hash: String,
    pub nonce: u64,
    pub transactions: Vec<TxRecord>,
}

/// An ordered sequence of blocks, index 0 first.
pub type Chain = Vec<Block>;

#[cfg(test)]
mod tests {
    use super::*;

    /// P6 depends on this: a whole-number reward configured as `1` must
    /// serialize as the JSON integer `1`, not the float `1.0`, or two
    /// independently-configured nodes compute different block preimages for
    /// an identical logical reward.
    #[test]
    fn parse_numeral_preserves_integer_literal() {
        let amount = Amount::parse_numeral("1").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "1");
    }

    #[test]
    fn parse_numeral_preserves_fractional_literal() {
        let amount = Amount::parse_numeral("1.5").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "1.5");
    }

    #[test]
    fn parse_numeral_rejects_non_numeric_input() {
        assert!(Amount::parse_numeral("not-a-number").is_none());
    }
}
