//! Protocol gadgets for the Pedersen proof of knowledge.
//!
//! This module contains the data carried between prover and verifier:
//! witness, commitment, proof and signature.

use core::fmt;

use num_bigint::BigUint;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Error, GroupParameters, Result};

/// Secret witness `(x, r)` for the relation `z = g^x * h^r`.
///
/// The two exponents are independent in general. The authentication adapter
/// deliberately uses the same secret for both, see [`Witness::single`].
///
/// # Security
///
/// - Exponents are kept as big-endian bytes and zeroized when dropped;
///   the accessors build short-lived integers on demand
/// - The witness must never be transmitted or logged
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Witness {
    x: Vec<u8>,
    r: Vec<u8>,
}

impl Witness {
    /// Creates a witness with independent exponents.
    pub fn new(x: BigUint, r: BigUint) -> Self {
        Self {
            x: x.to_bytes_be(),
            r: r.to_bytes_be(),
        }
    }

    /// Creates a witness that reuses one secret for both exponents.
    pub fn single(secret: BigUint) -> Self {
        let bytes = secret.to_bytes_be();
        Self {
            x: bytes.clone(),
            r: bytes,
        }
    }

    /// Returns the exponent of `g`.
    pub fn x(&self) -> BigUint {
        BigUint::from_bytes_be(&self.x)
    }

    /// Returns the exponent of `h`.
    pub fn r(&self) -> BigUint {
        BigUint::from_bytes_be(&self.r)
    }
}

impl fmt::Debug for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Witness(<redacted>)")
    }
}

/// A pair of group elements `(c1, c2)`.
///
/// At registration this is the public record `(g^x, h^r)`; during login it is
/// the blinded commitment `(g^k, h^k)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commitment {
    c1: BigUint,
    c2: BigUint,
}

impl Commitment {
    /// Creates a commitment from its two elements.
    pub fn new(c1: BigUint, c2: BigUint) -> Self {
        Self { c1, c2 }
    }

    /// Returns the element over `g`.
    pub fn c1(&self) -> &BigUint {
        &self.c1
    }

    /// Returns the element over `h`.
    pub fn c2(&self) -> &BigUint {
        &self.c2
    }

    /// Returns `c1 * c2 mod p`, the combined commitment checked by the verifier.
    pub fn product(&self, params: &GroupParameters) -> BigUint {
        params.mul(&self.c1, &self.c2)
    }

    /// Checks that both elements are residues modulo `p`.
    pub fn validate(&self, params: &GroupParameters) -> Result<()> {
        if !params.contains(&self.c1) || !params.contains(&self.c2) {
            return Err(Error::MalformedRequest(
                "commitment element is not reduced modulo p".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})",
            hex::encode(self.c1.to_bytes_be()),
            hex::encode(self.c2.to_bytes_be())
        )
    }
}

/// Prover response `(s_x, s_r)` to a challenge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    s_x: BigUint,
    s_r: BigUint,
}

impl Proof {
    /// Creates a proof from its two responses.
    pub fn new(s_x: BigUint, s_r: BigUint) -> Self {
        Self { s_x, s_r }
    }

    /// Returns the response for the `g` exponent.
    pub fn s_x(&self) -> &BigUint {
        &self.s_x
    }

    /// Returns the response for the `h` exponent.
    pub fn s_r(&self) -> &BigUint {
        &self.s_r
    }

    /// Flattens the proof into its stream form `[s_x, s_r]`.
    pub fn into_stream(self) -> [BigUint; 2] {
        [self.s_x, self.s_r]
    }
}

/// Non-interactive proof `(s_x, s_r, c)` bound to a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    proof: Proof,
    challenge: BigUint,
}

impl Signature {
    /// Creates a signature from a proof and the challenge it answers.
    pub fn new(proof: Proof, challenge: BigUint) -> Self {
        Self { proof, challenge }
    }

    /// Returns the proof part.
    pub fn proof(&self) -> &Proof {
        &self.proof
    }

    /// Returns the Fiat-Shamir challenge.
    pub fn challenge(&self) -> &BigUint {
        &self.challenge
    }
}
