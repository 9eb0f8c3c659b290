//! Fiat-Shamir hashing into the scalar field.
//!
//! The challenge derivation must be reproduced byte-for-byte by prover and
//! verifier: every integer is written as its minimal big-endian encoding (see
//! [`to_bytes`]), the bytes are concatenated and hashed with SHA-256, and the
//! digest is read as a big-endian integer reduced modulo `q`.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use super::arith::to_bytes;

/// Incremental SHA-256 transcript reduced into `Z_q`.
#[derive(Clone, Default)]
pub struct Transcript(Sha256);

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self(Sha256::new())
    }

    /// Appends an integer in its minimal big-endian form, without framing.
    pub fn append_uint(&mut self, value: &BigUint) {
        self.0.update(to_bytes(value));
    }

    /// Finalizes the transcript into a scalar in `[0, q)`.
    pub fn challenge_scalar(self, q: &BigUint) -> BigUint {
        let digest = self.0.finalize();
        BigUint::from_bytes_be(&digest) % q
    }
}

/// Hashes an ordered sequence of integers into `[0, q)`.
pub fn hash_to_scalar(q: &BigUint, values: &[&BigUint]) -> BigUint {
    let mut transcript = Transcript::new();
    for value in values {
        transcript.append_uint(value);
    }
    transcript.challenge_scalar(q)
}
