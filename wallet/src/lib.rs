//! Client-side wallet: keypair generation, address derivation, and
//! transaction signing.
//!
//! Wallets are ephemeral — nothing here is persisted. A node never holds a
//! wallet's secret key; `GET /wallet/new` hands one back to the caller once
//! and forgets it.

use ember_core::canon;
use ember_core::crypto;
use ember_core::types::Amount;
use secp256k1::{PublicKey, Secp256k1, SecretKey};

/// A secp256k1 keypair plus its derived address.
pub struct Wallet {
    secret_key: SecretKey,
    public_key: PublicKey,
    address: String,
}

impl Wallet {
    /// Generates a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut rand::rngs::OsRng);
        let address = crypto::derive_address(&crypto::public_key_bytes(&public_key));
        Self { secret_key, public_key, address }
    }

    /// Reconstructs a wallet from a hex-encoded 32-byte secret key.
    pub fn from_private_key_hex(private_key_hex: &str) -> Option<Self> {
        let bytes = hex::decode(private_key_hex).ok()?;
        let secret_key = SecretKey::from_slice(&bytes).ok()?;
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        let address = crypto::derive_address(&crypto::public_key_bytes(&public_key));
        Some(Self { secret_key, public_key, address })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(crypto::public_key_bytes(&self.public_key))
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Signs a transfer of `amount` to `recipient_address` at `timestamp`,
    /// returning the hex-encoded signature over the canonical signing
    /// preimage (sender address, recipient address, amount, timestamp).
    pub fn sign_transfer(&self, recipient_address: &str, amount: &Amount, timestamp: f64) -> String {
        let preimage = canon::signing_preimage(&self.address, recipient_address, amount, timestamp);
        crypto::sign(&self.secret_key, &preimage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_wallet_has_40_char_lowercase_address() {
        let wallet = Wallet::generate();
        assert_eq!(wallet.address().len(), 40);
        assert!(wallet.address().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn signed_transfer_verifies_against_the_wallets_own_public_key() {
        let wallet = Wallet::generate();
        let amount = Amount::from_u64(10);
        let timestamp = 1_700_000_001.0;
        let signature = wallet.sign_transfer("bob-addr", &amount, timestamp);

        let preimage = canon::signing_preimage(wallet.address(), "bob-addr", &amount, timestamp);
        assert!(crypto::verify(&wallet.public_key_hex(), &preimage, &signature));
    }

    #[test]
    fn roundtrips_through_private_key_hex() {
        let wallet = Wallet::generate();
        let restored = Wallet::from_private_key_hex(&wallet.private_key_hex()).unwrap();
        assert_eq!(wallet.address(), restored.address());
        assert_eq!(wallet.public_key_hex(), restored.public_key_hex());
    }

    #[test]
    fn signature_roundtrip_matches_literal_scenario() {
        let wallet = Wallet::generate();
        let amount = Amount::from_u64(10);
        let timestamp = 1_700_000_001.0;
        let signature = wallet.sign_transfer("bb", &amount, timestamp);

        let preimage = canon::signing_preimage(wallet.address(), "bb", &amount, timestamp);
        assert!(crypto::verify(&wallet.public_key_hex(), &preimage, &signature));

        let mut tampered = signature.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'0' { b'1' } else { b'0' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(!crypto::verify(&wallet.public_key_hex(), &preimage, &tampered));
    }
}
