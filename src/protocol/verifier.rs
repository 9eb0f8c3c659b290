use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use super::{Commitment, Proof, Signature};
use crate::primitives::rng::random_nonzero_below;
use crate::{hash_to_scalar, Error, GroupParameters, Result};

/// Verifier for the Pedersen proof of knowledge.
///
/// Holds `z = y1 * y2 mod p` of a prover's public record `(y1, y2)`. One
/// instance serves one session: the challenge it issues is never shared.
pub struct Verifier {
    params: GroupParameters,
    z: BigUint,
    challenge: Option<BigUint>,
}

impl Verifier {
    /// Creates a new verifier for the given public record.
    pub fn new(params: GroupParameters, record: &Commitment) -> Self {
        let z = record.product(&params);
        Self {
            params,
            z,
            challenge: None,
        }
    }

    /// Returns the challenge issued by [`Verifier::create_challenge`], if any.
    pub fn challenge(&self) -> Option<&BigUint> {
        self.challenge.as_ref()
    }

    /// Interactive protocol: draws a challenge with [`random_challenge`].
    ///
    /// The challenge is stored on the verifier and returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChallengeConstruction`] if the entropy source fails.
    pub fn create_challenge<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<BigUint> {
        let challenge = random_challenge(&self.params, rng)?;
        self.challenge = Some(challenge.clone());
        Ok(challenge)
    }

    /// Recomputes the combined commitment `g^s_x * h^s_r * z^c mod p`.
    ///
    /// For an honest prover this equals `c1 * c2 mod p` of the login commitment.
    pub fn recover_commitment(&self, challenge: &BigUint, proof: &Proof) -> BigUint {
        self.recover(challenge, proof.s_x(), proof.s_r())
    }

    fn recover(&self, challenge: &BigUint, s_x: &BigUint, s_r: &BigUint) -> BigUint {
        let params = &self.params;
        let gx = params.exp(params.generator_g(), s_x);
        let hr = params.exp(params.generator_h(), s_r);
        let zc = params.exp(&self.z, challenge);
        params.mul(&params.mul(&gx, &hr), &zc)
    }

    /// Checks a proof against the combined commitment the prover sent.
    pub fn verify(&self, committed: &BigUint, challenge: &BigUint, proof: &Proof) -> bool {
        &self.recover_commitment(challenge, proof) == committed
    }

    /// Consumes one commitment and one two-element proof from parallel streams.
    ///
    /// Returns the verdict for the consumed pair and the unconsumed remainders,
    /// so several provers answering one challenge can be checked by chaining
    /// calls. If either stream is too short nothing is consumed and the verdict
    /// is `false`.
    pub fn consume_verify<'a>(
        &self,
        commitments: &'a [BigUint],
        challenge: &BigUint,
        proofs: &'a [BigUint],
    ) -> (bool, &'a [BigUint], &'a [BigUint]) {
        let (Some((committed, rest_commitments)), [s_x, s_r, rest_proofs @ ..]) =
            (commitments.split_first(), proofs)
        else {
            return (false, commitments, proofs);
        };

        let valid = &self.recover(challenge, s_x, s_r) == committed;
        (valid, rest_commitments, rest_proofs)
    }

    /// Verifies streams that carry exactly one commitment and one proof.
    pub fn verify_stream(
        &self,
        commitments: &[BigUint],
        challenge: &BigUint,
        proofs: &[BigUint],
    ) -> bool {
        let (valid, rest_commitments, rest_proofs) =
            self.consume_verify(commitments, challenge, proofs);
        valid && rest_commitments.is_empty() && rest_proofs.is_empty()
    }

    /// Non-interactive verification of a [`Signature`] over `message`.
    ///
    /// The challenge is re-derived from the recovered commitment rather than
    /// trusted, which ties `(s_x, s_r, c)` to one consistent commitment.
    pub fn verify_signature(&self, message: &BigUint, signature: &Signature) -> bool {
        let recovered = self.recover_commitment(signature.challenge(), signature.proof());
        let expected = hash_to_scalar(self.params.order(), &[message, &recovered]);
        &expected == signature.challenge()
    }
}

/// Draws a uniformly random non-zero challenge in `[1, q)`.
///
/// A zero draw is discarded and redrawn.
///
/// # Errors
///
/// Returns [`Error::ChallengeConstruction`] if the entropy source fails.
pub fn random_challenge<R: RngCore + CryptoRng>(
    params: &GroupParameters,
    rng: &mut R,
) -> Result<BigUint> {
    random_nonzero_below(params.order(), rng).map_err(|e| match e {
        Error::Randomness(source) => Error::ChallengeConstruction(source),
        other => other,
    })
}

/// Verifies aggregated proofs of several provers answering one challenge.
///
/// Each verifier consumes its chunk of both streams in order; the result is
/// true only if every chunk verifies and both streams are exhausted.
pub fn verify_aggregated(
    verifiers: &[Verifier],
    commitments: &[BigUint],
    challenge: &BigUint,
    proofs: &[BigUint],
) -> bool {
    let mut commitments = commitments;
    let mut proofs = proofs;

    for verifier in verifiers {
        let (valid, rest_commitments, rest_proofs) =
            verifier.consume_verify(commitments, challenge, proofs);
        if !valid {
            return false;
        }
        commitments = rest_commitments;
        proofs = rest_proofs;
    }

    !verifiers.is_empty() && commitments.is_empty() && proofs.is_empty()
}
