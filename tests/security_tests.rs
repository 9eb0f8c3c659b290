mod common;

use common::{small_params, FailingRng, FixedRng};
use num_bigint::BigUint;
use pedersen_auth::primitives::arith::is_zero;
use pedersen_auth::{
    derive_secret, Commitment, Error, GroupParameters, Proof, Prover, SecureRng, Signature,
    Verifier, Witness,
};

#[test]
fn challenge_is_never_zero() {
    let params = small_params();
    let mut rng = SecureRng::new();
    let record = Commitment::new(BigUint::from(2u32), BigUint::from(3u32));
    let mut verifier = Verifier::new(params.clone(), &record);

    let mut seen = [false; 11];
    for _ in 0..10_000 {
        let challenge = verifier.create_challenge(&mut rng).unwrap();
        assert!(!is_zero(&challenge), "challenge must never be zero");
        assert!(&challenge < params.order());
        let index = challenge.to_u32_digits().first().copied().unwrap_or(0) as usize;
        seen[index] = true;
    }

    assert!(!seen[0]);
    assert!(seen[1..].iter().all(|&hit| hit), "every non-zero challenge should occur");
}

/// Replays a fixed byte sequence.
struct Sequence(Vec<u8>);

impl rand::RngCore for Sequence {
    fn next_u32(&mut self) -> u32 {
        next_word(self)
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(next_word(self))
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.0.remove(0);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl rand::CryptoRng for Sequence {}

fn next_word(rng: &mut Sequence) -> u32 {
    let mut buf = [0u8; 4];
    rand::RngCore::fill_bytes(rng, &mut buf);
    u32::from_le_bytes(buf)
}

#[test]
fn zero_and_out_of_range_draws_are_redrawn() {
    let mut verifier = Verifier::new(
        small_params(),
        &Commitment::new(BigUint::from(2u32), BigUint::from(3u32)),
    );
    // 0 is redrawn, 11 is outside [0, q), 5 is accepted
    let mut rng = Sequence(vec![0x00, 0x0b, 0x05]);
    assert_eq!(verifier.create_challenge(&mut rng).unwrap(), BigUint::from(5u32));
    assert!(rng.0.is_empty());

    // the high nibble is masked off before the range check
    assert_eq!(
        verifier.create_challenge(&mut FixedRng(0x14)).unwrap(),
        BigUint::from(4u32)
    );
}

#[test]
fn signature_forgery_is_rejected() {
    let params = GroupParameters::rfc5114().clone();
    let mut rng = SecureRng::new();
    let mut prover = Prover::new(
        params.clone(),
        Witness::new(BigUint::from(1234u32), BigUint::from(5678u32)),
    );
    let verifier = Verifier::new(params.clone(), &prover.public_commitment());
    let message = BigUint::from(42u32);

    let signature = prover.sign(&message, &mut rng).unwrap();
    assert!(verifier.verify_signature(&message, &signature));

    let tampered_proof = Signature::new(
        Proof::new(
            (signature.proof().s_x() + 1u32) % params.order(),
            signature.proof().s_r().clone(),
        ),
        signature.challenge().clone(),
    );
    assert!(!verifier.verify_signature(&message, &tampered_proof));

    // valid signature under another witness
    let mut impostor = Prover::new(
        params.clone(),
        Witness::new(BigUint::from(4321u32), BigUint::from(8765u32)),
    );
    let forged = impostor.sign(&message, &mut rng).unwrap();
    assert!(!verifier.verify_signature(&message, &forged));
}

#[test]
fn signature_is_bound_to_message() {
    let params = GroupParameters::rfc5114().clone();
    let mut rng = SecureRng::new();
    let mut prover = Prover::new(params.clone(), Witness::single(BigUint::from(99u32)));
    let verifier = Verifier::new(params, &prover.public_commitment());

    let signature = prover.sign(&BigUint::from(1u32), &mut rng).unwrap();
    assert!(!verifier.verify_signature(&BigUint::from(2u32), &signature));
}

#[test]
fn reused_blinding_leaks_secret() {
    // two answers to one commitment reveal x, so a prover must answer once
    let params = small_params();
    let secret = BigUint::from(6u32);
    let mut prover = Prover::new(params.clone(), Witness::single(secret.clone()));
    prover.compute_commitments(&mut FixedRng(7)).unwrap();

    let s1 = prover.compute_proof(&BigUint::from(4u32)).unwrap();
    let s2 = prover.compute_proof(&BigUint::from(5u32)).unwrap();

    // s1 - s2 = (c2 - c1) * x = x (mod q)
    let q = params.order();
    let recovered = (s1.s_x() + q - s2.s_x()) % q;
    assert_eq!(recovered, secret);
}

#[test]
fn entropy_failure_is_reported() {
    let mut prover = Prover::new(small_params(), Witness::single(BigUint::from(6u32)));
    assert!(matches!(
        prover.compute_commitments(&mut FailingRng),
        Err(Error::Randomness(_))
    ));
    assert!(matches!(
        prover.sign(&BigUint::from(1u32), &mut FailingRng),
        Err(Error::Randomness(_))
    ));

    let mut verifier = Verifier::new(
        small_params(),
        &Commitment::new(BigUint::from(2u32), BigUint::from(3u32)),
    );
    assert!(matches!(
        verifier.create_challenge(&mut FailingRng),
        Err(Error::ChallengeConstruction(_))
    ));
    assert!(verifier.challenge().is_none());
}

#[test]
fn proof_before_commitment_is_an_error() {
    let prover = Prover::new(small_params(), Witness::single(BigUint::from(6u32)));
    assert!(matches!(
        prover.compute_proof(&BigUint::from(4u32)),
        Err(Error::MissingCommitment)
    ));
}

#[test]
fn password_secrets_are_user_bound() {
    let q = GroupParameters::rfc5114().order();
    let alice = derive_secret(q, "alice", "hunter2").unwrap();
    let bob = derive_secret(q, "bob", "hunter2").unwrap();

    assert_ne!(alice, bob);
    assert_eq!(alice, derive_secret(q, "alice", "hunter2").unwrap());
    assert!(&alice < q);
}

#[test]
fn invalid_group_parameters_are_rejected() {
    let n = |v: u32| BigUint::from(v);

    // q does not divide p - 1
    assert!(matches!(
        GroupParameters::new(n(23), n(7), n(4), n(9)),
        Err(Error::InvalidParams(_))
    ));
    // g == h
    assert!(GroupParameters::new(n(23), n(11), n(4), n(4)).is_err());
    // 5 has order 22, not 11
    assert!(GroupParameters::new(n(23), n(11), n(5), n(9)).is_err());
    // even modulus
    assert!(GroupParameters::new(n(24), n(11), n(4), n(9)).is_err());
}
