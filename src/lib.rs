//! Pedersen proof-of-knowledge registration and login.
//!
//! A client registers `(g^x mod p, h^x mod p)` for a secret `x` and later
//! proves knowledge of `x` in a commit/challenge/response exchange, without
//! the secret ever leaving the client. Messages travel as protobuf envelopes
//! inside length-prefixed frames over any ordered byte stream.

use num_bigint::BigUint;

/// Authentication adapter (register/login on top of the commitment math).
pub mod auth;
/// Client flows for register and login.
pub mod client;
/// Error types.
pub mod error;
/// Envelope codec, packet framing and typed connections.
pub mod network;
/// Group parameters, modular arithmetic, randomness and hashing.
pub mod primitives;
/// Prover and verifier of the proof of knowledge.
pub mod protocol;
/// Server accept loop, sessions and the user registry.
pub mod server;

pub use auth::{verify_authentication, AuthProver};
pub use client::{Client, ServerVerdict};
pub use error::Error;
pub use primitives::{derive_secret, hash_to_scalar, GroupParameters, SecureRng, Transcript};
pub use protocol::{verify_aggregated, Commitment, Proof, Prover, Signature, Verifier, Witness};

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Decodes a wire integer (minimal big-endian, empty means zero).
pub fn uint_from_wire(bytes: &[u8]) -> BigUint {
    primitives::arith::from_bytes(bytes)
}

/// Encodes an integer for the wire (minimal big-endian, zero is `[0]`).
pub fn uint_to_wire(value: &BigUint) -> Vec<u8> {
    primitives::arith::to_bytes(value)
}
