//! Core arithmetic building blocks for the commitment scheme.
//!
//! - **group**: public parameters `{p, q, g, h}`
//! - **arith**: modular helpers and the integer wire encoding
//! - **rng**: secure randomness and uniform sampling
//! - **kdf**: password stretching into `Z_q`
//! - **transcript**: hashing into `Z_q` for the Fiat-Shamir transform

/// Modular arithmetic helpers.
pub mod arith;
/// Group parameters.
pub mod group;
/// Password-based secret derivation.
pub mod kdf;
/// Cryptographically secure random number generation.
pub mod rng;
/// Hash-to-scalar transcript.
pub mod transcript;

pub use group::GroupParameters;
pub use kdf::derive_secret;
pub use rng::SecureRng;
pub use transcript::{hash_to_scalar, Transcript};
