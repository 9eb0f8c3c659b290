use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{Commitment, Proof, Signature, Witness};
use crate::primitives::arith::mod_sub;
use crate::primitives::rng::random_nonzero_below;
use crate::{hash_to_scalar, Error, GroupParameters, Result};

/// Prover for the Pedersen proof of knowledge of `(x, r)` with `z = g^x * h^r`.
///
/// # Security
///
/// - Always draw blinding values from a [`SecureRng`](crate::SecureRng)
/// - Answer at most one challenge per commitment: two answers for the same
///   blinding value reveal the witness
pub struct Prover {
    params: GroupParameters,
    witness: Witness,
    nonce: Option<Nonce>,
}

impl Prover {
    /// Creates a new prover with the given parameters and witness.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use num_bigint::BigUint;
    /// use pedersen_auth::{GroupParameters, Prover, SecureRng, Witness};
    ///
    /// let params = GroupParameters::rfc5114().clone();
    /// let mut prover = Prover::new(params, Witness::single(BigUint::from(42u32)));
    /// let commitment = prover.compute_commitments(&mut SecureRng::new()).unwrap();
    /// assert_ne!(commitment.c1(), commitment.c2());
    /// ```
    pub fn new(params: GroupParameters, witness: Witness) -> Self {
        Self {
            params,
            witness,
            nonce: None,
        }
    }

    /// Returns the public record `(g^x mod p, h^r mod p)`.
    pub fn public_commitment(&self) -> Commitment {
        Commitment::new(
            self.params.exp(self.params.generator_g(), &self.witness.x()),
            self.params.exp(self.params.generator_h(), &self.witness.r()),
        )
    }

    /// Draws a fresh blinding value `k` and returns `(g^k mod p, h^k mod p)`.
    ///
    /// Each call replaces the previous blinding value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Randomness`] if the entropy source fails.
    pub fn compute_commitments<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
    ) -> Result<Commitment> {
        let k = random_nonzero_below(self.params.order(), rng)?;
        let commitment = Commitment::new(
            self.params.exp(self.params.generator_g(), &k),
            self.params.exp(self.params.generator_h(), &k),
        );
        self.nonce = Some(Nonce::new(k));
        Ok(commitment)
    }

    /// Answers a challenge: `s_x = (k - c*x) mod q`, `s_r = (k - c*r) mod q`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCommitment`] if no commitment was computed yet.
    pub fn compute_proof(&self, challenge: &BigUint) -> Result<Proof> {
        let nonce = self.nonce.as_ref().ok_or(Error::MissingCommitment)?;
        let q = self.params.order();
        let c = challenge % q;

        let k = nonce.k();
        let s_x = mod_sub(&k, &(&c * self.witness.x()), q);
        let s_r = mod_sub(&k, &(&c * self.witness.r()), q);

        Ok(Proof::new(s_x, s_r))
    }

    /// Produces a non-interactive proof bound to `message` (Fiat-Shamir).
    ///
    /// The challenge is `H(message, c1 * c2 mod p) mod q`.
    pub fn sign<R: RngCore + CryptoRng>(
        &mut self,
        message: &BigUint,
        rng: &mut R,
    ) -> Result<Signature> {
        let commitment = self.compute_commitments(rng)?;
        let combined = commitment.product(&self.params);
        let challenge = hash_to_scalar(self.params.order(), &[message, &combined]);
        let proof = self.compute_proof(&challenge)?;

        Ok(Signature::new(proof, challenge))
    }
}

/// Secret blinding value used in the commitment phase.
///
/// Stored as big-endian bytes and zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Nonce {
    k: Vec<u8>,
}

impl Nonce {
    /// Creates a new nonce from a scalar.
    pub fn new(k: BigUint) -> Self {
        Self { k: k.to_bytes_be() }
    }

    /// Returns the nonce scalar.
    pub fn k(&self) -> BigUint {
        BigUint::from_bytes_be(&self.k)
    }
}
