/// Protocol types (witness, commitment, proof, signature).
pub mod gadgets;
/// Prover implementation for generating proofs.
pub mod prover;
/// Verifier implementation for validating proofs.
pub mod verifier;

pub use gadgets::{Commitment, Proof, Signature, Witness};
pub use prover::{Nonce, Prover};
pub use verifier::{random_challenge, verify_aggregated, Verifier};
