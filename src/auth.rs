//! Authentication adapter binding the commitment math to register/login.
//!
//! The user's single secret is used for both exponents, so the registered
//! record is `(g^x, h^x)` and only the first coordinate of a proof is sent.
//! This is a restriction of the login protocol, not of [`Prover`].

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use crate::{Commitment, GroupParameters, Prover, Result, Witness};

/// Client side of the login protocol.
pub struct AuthProver {
    prover: Prover,
}

impl AuthProver {
    /// Creates a prover holding `secret` for both exponents.
    pub fn new(params: GroupParameters, secret: BigUint) -> Self {
        Self {
            prover: Prover::new(params, Witness::single(secret)),
        }
    }

    /// Returns the registration record `(g^x mod p, h^x mod p)`.
    ///
    /// Deterministic: no randomness is involved.
    pub fn create_register_commits(&self) -> Commitment {
        self.prover.public_commitment()
    }

    /// Returns a fresh login commitment `(g^k mod p, h^k mod p)`.
    pub fn create_authentication_commits<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
    ) -> Result<Commitment> {
        self.prover.compute_commitments(rng)
    }

    /// Answers the server challenge with `s = (k - c*x) mod q`.
    pub fn prove_authentication(&self, challenge: &BigUint) -> Result<BigUint> {
        let [s_x, _] = self.prover.compute_proof(challenge)?.into_stream();
        Ok(s_x)
    }
}

/// Checks a login answer against the registered record.
///
/// Accepts iff `g^s * y1^c == r1` and `h^s * y2^c == r2` modulo `p`.
pub fn verify_authentication(
    params: &GroupParameters,
    registered: &Commitment,
    session: &Commitment,
    challenge: &BigUint,
    answer: &BigUint,
) -> bool {
    let lhs1 = params.mul(
        &params.exp(params.generator_g(), answer),
        &params.exp(registered.c1(), challenge),
    );
    let lhs2 = params.mul(
        &params.exp(params.generator_h(), answer),
        &params.exp(registered.c2(), challenge),
    );

    &lhs1 == session.c1() && &lhs2 == session.c2()
}
