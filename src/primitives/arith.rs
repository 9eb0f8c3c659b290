//! Modular arithmetic helpers and the wire encoding of integers.

use num_bigint::BigUint;

use crate::{Error, Result};

/// Computes `base^exp mod modulus`.
///
/// Every exponentiation in the protocol goes through a modulus; an unbounded
/// power would make all equality checks meaningless.
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if is_zero(modulus) {
        return Err(Error::InvalidParams("modulus cannot be zero".to_string()));
    }
    Ok(base.modpow(exp, modulus))
}

/// Computes `(a - b) mod modulus` without leaving the unsigned integers.
///
/// The caller guarantees a non-zero modulus.
pub fn mod_sub(a: &BigUint, b: &BigUint, modulus: &BigUint) -> BigUint {
    let a = a % modulus;
    let b = b % modulus;
    if a >= b {
        a - b
    } else {
        modulus - (b - a)
    }
}

/// Returns true if `value` is zero.
pub fn is_zero(value: &BigUint) -> bool {
    value.bits() == 0
}

/// Encodes an integer as minimal big-endian bytes.
///
/// Zero is encoded as a single `0x00` byte.
pub fn to_bytes(value: &BigUint) -> Vec<u8> {
    value.to_bytes_be()
}

/// Decodes big-endian bytes into an integer.
///
/// Leading zero bytes are ignored and an empty slice decodes to zero.
pub fn from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}
