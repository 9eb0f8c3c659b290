//! Public group parameters for the commitment scheme.
//!
//! The default domain is the RFC 5114 §2.3 2048-bit MODP group with a 256-bit
//! prime-order subgroup. The second generator `h` is hashed into the subgroup
//! from a fixed tag, so nobody knows `log_g(h)`.

use std::sync::OnceLock;

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use super::arith::{is_zero, mod_pow};
use crate::{Error, Result};

/// Domain separation tag for deriving the second generator.
const GENERATOR_H_DST: &[u8] = b"pedersen-auth/generator-h/v1";

/// Extra bytes sampled beyond the modulus width to keep the reduction unbiased.
const EXTRA_BYTES: usize = 16;

const RFC5114_P: &str = "87A8E61DB4B6663CFFBBD19C651959998CEEF608660DD0F25D2CEED4435E3B00E00DF8F1D61957D4FAF7DF4561B2AA3016C3D91134096FAA3BF4296D830E9A7C209E0C6497517ABD5A8A9D306BCF67ED91F9E6725B4758C022E0B1EF4275BF7B6C5BFC11D45F9088B941F54EB1E59BB8BC39A0BF12307F5C4FDB70C581B23F76B63ACAE1CAA6B7902D52526735488A0EF13C6D9A51BFA4AB3AD8347796524D8EF6A167B5A41825D967E144E5140564251CCACB83E6B486F6B3CA3F7971506026C0B857F689962856DED4010ABD0BE621C3A3960A54E710C375F26375D7014103A4B54330C198AF126116D2276E11715F693877FAD7EF09CADB094AE91E1A1597";

const RFC5114_Q: &str = "8CF83642A709A097B447997640129DA299B1A47D1EB3750BA308B0FE64F5FBD3";

const RFC5114_G: &str = "3FB32C9B73134D0B2E77506660EDBD484CA7B18F21EF205407F4793A1A0BA12510DBC15077BE463FFF4FED4AAC0BB555BE3A6C1B0C6B47B1BC3773BF7E8C6F62901228F8C28CBB18A55AE31341000A650196F931C77A57F2DDF463E5E9EC144B777DE62AAAB8A8628AC376D282D6ED3864E67982428EBC831D14348F6F2F9193B5045AF2767164E1DFC967C1FB3F2E55A4BD1BFFE83B9C80D052B985D182EA0ADB2A3B7313D3FE14C8484B1E052588B9B7D2BBD2DF016199ECD06E1557CD0915B3353BBB64E0EC377FD028370DF92B52C7891428CDC67EB6184B523D1DB246C32F63078490F00EF8D647D148D47954515E2327CFEF98C582664B4C0F6CC41659";

static RFC5114: OnceLock<GroupParameters> = OnceLock::new();

/// Public parameters `{p, q, g, h}` shared by every prover and verifier.
///
/// # Invariants
///
/// - `p` is odd and `q` divides `p - 1`
/// - `g` and `h` are distinct elements of order `q` modulo `p`
///
/// Primality of `p` and `q` is not re-checked at runtime; custom parameters
/// must come from a trusted source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupParameters {
    p: BigUint,
    q: BigUint,
    g: BigUint,
    h: BigUint,
}

impl GroupParameters {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if any invariant listed on the type is violated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use num_bigint::BigUint;
    /// use pedersen_auth::GroupParameters;
    ///
    /// let params = GroupParameters::new(
    ///     BigUint::from(23u32),
    ///     BigUint::from(11u32),
    ///     BigUint::from(4u32),
    ///     BigUint::from(9u32),
    /// )
    /// .unwrap();
    /// assert_eq!(params.modulus(), &BigUint::from(23u32));
    /// ```
    pub fn new(p: BigUint, q: BigUint, g: BigUint, h: BigUint) -> Result<Self> {
        let one = BigUint::from(1u8);

        if p <= BigUint::from(3u8) || !p.bit(0) {
            return Err(Error::InvalidParams("modulus p must be an odd number > 3".to_string()));
        }

        if q <= one {
            return Err(Error::InvalidParams("subgroup order q must be > 1".to_string()));
        }

        if !is_zero(&((&p - &one) % &q)) {
            return Err(Error::InvalidParams("q must divide p - 1".to_string()));
        }

        if g == h {
            return Err(Error::InvalidParams("generators g and h must be different".to_string()));
        }

        for (name, generator) in [("g", &g), ("h", &h)] {
            if generator <= &one || generator >= &p {
                return Err(Error::InvalidParams(format!(
                    "generator {name} must lie in (1, p)"
                )));
            }
            if mod_pow(generator, &q, &p)? != one {
                return Err(Error::InvalidParams(format!(
                    "generator {name} does not have order q"
                )));
            }
        }

        Ok(Self { p, q, g, h })
    }

    /// Returns the RFC 5114 2048-bit group with 256-bit subgroup.
    ///
    /// Computed once per process.
    pub fn rfc5114() -> &'static Self {
        RFC5114.get_or_init(|| {
            let p = parse_hex(RFC5114_P);
            let q = parse_hex(RFC5114_Q);
            let g = parse_hex(RFC5114_G);
            let h = hash_to_subgroup(&p, &q, GENERATOR_H_DST);
            Self { p, q, g, h }
        })
    }

    /// Returns the modulus `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Returns the subgroup order `q`.
    pub fn order(&self) -> &BigUint {
        &self.q
    }

    /// Returns the first generator `g`.
    pub fn generator_g(&self) -> &BigUint {
        &self.g
    }

    /// Returns the second generator `h`.
    pub fn generator_h(&self) -> &BigUint {
        &self.h
    }

    /// Computes `base^exp mod p`.
    pub fn exp(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        base.modpow(exp, &self.p)
    }

    /// Computes `a * b mod p`.
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    /// Returns true if `element` is a residue modulo `p`.
    pub fn contains(&self, element: &BigUint) -> bool {
        element < &self.p
    }
}

impl Default for GroupParameters {
    fn default() -> Self {
        Self::rfc5114().clone()
    }
}

fn parse_hex(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16)
        .unwrap_or_else(|| unreachable!("RFC 5114 constants are valid hex"))
}

/// Maps a tag to an element of order `q` by hashing to `Z_p` and raising to the cofactor.
fn hash_to_subgroup(p: &BigUint, q: &BigUint, dst: &[u8]) -> BigUint {
    let one = BigUint::from(1u8);
    let cofactor = (p - &one) / q;
    let width = (p.bits() as usize).div_ceil(8) + EXTRA_BYTES;
    let mut counter: u32 = 0;

    loop {
        let mut bytes = Vec::with_capacity(width + 32);
        let mut block: u32 = 0;
        while bytes.len() < width {
            let digest = Sha256::new()
                .chain_update(dst)
                .chain_update(counter.to_be_bytes())
                .chain_update(block.to_be_bytes())
                .finalize();
            bytes.extend_from_slice(&digest);
            block += 1;
        }
        bytes.truncate(width);

        let candidate = BigUint::from_bytes_be(&bytes) % p;
        let element = candidate.modpow(&cofactor, p);
        if element > one {
            return element;
        }
        counter += 1;
    }
}
