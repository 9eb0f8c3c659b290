//! Cryptographically secure random number generation.

use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use super::arith::is_zero;
use crate::{Error, Result};

/// Cryptographically secure random number generator.
///
/// This is a thin wrapper around `OsRng` that provides a consistent interface
/// for cryptographic randomness throughout the library.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new cryptographically secure random number generator.
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

/// Draws an integer uniformly from `[0, bound)`.
///
/// Uses rejection sampling over `bits(bound)` random bits, so the result is
/// unbiased. Entropy failures surface as [`Error::Randomness`].
pub fn random_below<R: RngCore + CryptoRng>(bound: &BigUint, rng: &mut R) -> Result<BigUint> {
    if is_zero(bound) {
        return Err(Error::InvalidParams("sampling bound cannot be zero".to_string()));
    }

    let bits = bound.bits() as usize;
    let len = bits.div_ceil(8);
    let mask = 0xffu8 >> (len * 8 - bits);
    let mut buf = vec![0u8; len];

    loop {
        rng.try_fill_bytes(&mut buf)?;
        buf[0] &= mask;
        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Draws an integer uniformly from `[1, bound)`, redrawing on zero.
pub fn random_nonzero_below<R: RngCore + CryptoRng>(
    bound: &BigUint,
    rng: &mut R,
) -> Result<BigUint> {
    loop {
        let value = random_below(bound, rng)?;
        if !is_zero(&value) {
            return Ok(value);
        }
    }
}
