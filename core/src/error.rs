//! Error types for the **Ember** core crate.
//!
//! All high-level operations return [`crate::Result`], a convenient alias for
//! `core::result::Result<T, Error>`. Lower-level errors (hex decoding,
//! signature parsing) are mapped into one of these variants before bubbling
//! up to callers.
//!
//! Admission and mining errors are surfaced to API callers as 4xx responses;
//! consensus and peer-notification errors never are — see `peers` and
//! `node`, which treat them as best-effort and log instead of propagating.

use thiserror::Error;

/// Core crate error type.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// Signature could not be verified against the declared public key.
    #[error("invalid signature")]
    InvalidSignature,

    /// A required field was absent from a client-supplied request.
    #[error("missing fields")]
    MissingFields,

    /// `mine` was called with an empty transaction pool.
    #[error("nothing to mine")]
    NothingToMine,

    /// The mined block's `previous_hash` no longer matches the chain tip
    /// (lost the race against a concurrent append or consensus replacement).
    #[error("append conflict")]
    AppendConflict,

    /// A candidate chain failed validation during consensus.
    #[error("invalid chain")]
    InvalidChain,

    /// A peer could not be reached while fetching its chain.
    #[error("peer unreachable")]
    PeerUnreachable,

    /// Hex decoding failed for a public key or signature field.
    #[error("invalid hex encoding")]
    InvalidHex,
}

/// Convenient result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
