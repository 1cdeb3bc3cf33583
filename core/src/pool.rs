//! Transaction pool: an ordered, insertion-order-preserving list of admitted
//! pending transactions, drained wholesale on a successful mine.
//!
//! No deduplication and no balance check at admission time — balances are
//! derived only on query and are never consulted here.

use crate::canon;
use crate::crypto;
use crate::error::{Error, Result};
use crate::types::{Amount, RegularTx, TxRecord};

/// Ordered list of pending transactions.
#[derive(Debug, Clone, Default)]
pub struct Pool {
    transactions: Vec<TxRecord>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifies and admits a regular transaction.
    ///
    /// Derives the sender address from `sender_pubkey_hex` (the client
    /// cannot assert a mismatched address — it is always recomputed), builds
    /// the signing preimage, and verifies `signature_hex` against it. On
    /// success the transaction is appended; on failure the pool is
    /// unchanged and [`Error::InvalidSignature`] is returned.
    pub fn submit(
        &mut self,
        sender_pubkey_hex: &str,
        recipient_address: &str,
        amount: Amount,
        signature_hex: &str,
        timestamp: f64,
    ) -> Result<()> {
        let sender_address = crypto::derive_address_from_hex(sender_pubkey_hex).ok_or(Error::InvalidSignature)?;
        let preimage = canon::signing_preimage(&sender_address, recipient_address, &amount, timestamp);

        if !crypto::verify(sender_pubkey_hex, &preimage, signature_hex) {
            return Err(Error::InvalidSignature);
        }

        self.transactions.push(TxRecord::Regular(RegularTx {
            sender_address,
            sender_pubkey: Some(sender_pubkey_hex.to_string()),
            recipient_address: recipient_address.to_string(),
            amount,
            timestamp,
            signature: Some(signature_hex.to_string()),
        }));
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// An insertion-order snapshot of pending transactions.
    pub fn snapshot(&self) -> Vec<TxRecord> {
        self.transactions.clone()
    }

    /// Drains the first `count` entries — the ones an earlier [`snapshot`]
    /// captured and a miner included in an appended block — leaving any
    /// transaction submitted afterwards (while the proof-of-work search ran
    /// unlocked) in place for the next mine.
    ///
    /// [`snapshot`]: Pool::snapshot
    pub fn clear_mined(&mut self, count: usize) {
        self.transactions.drain(..count.min(self.transactions.len()));
    }
}
