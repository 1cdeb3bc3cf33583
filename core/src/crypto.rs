//! Crypto primitives: SHA-256 (re-exported from [`canon`]), RIPEMD-160, and
//! secp256k1 sign/verify.
//!
//! Decode errors, length mismatches, and verification failures are all
//! folded into a single boolean `invalid` result — callers get no
//! finer-grained diagnostic than "this signature did not verify".

use ripemd::Ripemd160;
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

pub use crate::canon::sha256_hex;

/// Uncompressed secp256k1 public key length used on the wire: `X(32) || Y(32)`.
pub const PUBKEY_LEN: usize = 64;

/// Derives a 40-char lowercase hex address from an uncompressed public key:
/// `RIPEMD160(SHA256(pubkey_bytes))`.
///
/// `pubkey_bytes` is the raw 64-byte `X||Y` encoding (no `0x04` prefix).
pub fn derive_address(pubkey_bytes: &[u8]) -> String {
    let sha = Sha256::digest(pubkey_bytes);
    let ripe = Ripemd160::digest(sha);
    hex::encode(ripe)
}

/// Derives an address directly from a hex-encoded public key, failing with
/// `None` on malformed hex (the caller folds this into `InvalidSignature`).
pub fn derive_address_from_hex(pubkey_hex: &str) -> Option<String> {
    let bytes = hex::decode(pubkey_hex).ok()?;
    Some(derive_address(&bytes))
}

/// Signs `preimage` (already canonically encoded) with `secret_key`,
/// returning the compact 64-byte `r||s` signature as lowercase hex.
///
/// The secp256k1 ECDSA API signs a 32-byte message; `preimage` is hashed
/// with SHA-256 first, the standard hash-then-sign pattern for secp256k1
/// (the same one Bitcoin message signing uses).
pub fn sign(secret_key: &SecretKey, preimage: &[u8]) -> String {
    let secp = Secp256k1::signing_only();
    let digest: [u8; 32] = Sha256::digest(preimage).into();
    let message = Message::from_digest_slice(&digest).expect("sha256 digest is 32 bytes");
    let signature = secp.sign_ecdsa(&message, secret_key);
    hex::encode(signature.serialize_compact())
}

/// Verifies a hex-encoded compact signature over `preimage` against a
/// hex-encoded, uncompressed (64-byte, no prefix) public key.
///
/// Any decode error, length mismatch, or cryptographic failure returns
/// `false` — there is no richer error channel.
pub fn verify(pubkey_hex: &str, preimage: &[u8], signature_hex: &str) -> bool {
    verify_inner(pubkey_hex, preimage, signature_hex).unwrap_or(false)
}

fn verify_inner(pubkey_hex: &str, preimage: &[u8], signature_hex: &str) -> Option<bool> {
    let pubkey_bytes = hex::decode(pubkey_hex).ok()?;
    if pubkey_bytes.len() != PUBKEY_LEN {
        return None;
    }
    let mut uncompressed = [0u8; 65];
    uncompressed[0] = 0x04;
    uncompressed[1..].copy_from_slice(&pubkey_bytes);
    let public_key = PublicKey::from_slice(&uncompressed).ok()?;

    let sig_bytes = hex::decode(signature_hex).ok()?;
    let signature = Signature::from_compact(&sig_bytes).ok()?;

    let digest: [u8; 32] = Sha256::digest(preimage).into();
    let message = Message::from_digest_slice(&digest).ok()?;

    let secp = Secp256k1::verification_only();
    Some(secp.verify_ecdsa(&message, &signature, &public_key).is_ok())
}

/// Serializes a secp256k1 public key to its raw 64-byte `X||Y` wire form
/// (strips the `0x04` uncompressed-point prefix).
pub fn public_key_bytes(public_key: &PublicKey) -> [u8; PUBKEY_LEN] {
    let uncompressed = public_key.serialize_uncompressed();
    let mut out = [0u8; PUBKEY_LEN];
    out.copy_from_slice(&uncompressed[1..]);
    out
}
