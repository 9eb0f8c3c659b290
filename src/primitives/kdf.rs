//! Password to secret derivation.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Prefix of the per-user salt hash.
const SALT_DST: &[u8] = b"pedersen-auth-v1-";

/// Derives a user secret in `[0, q)` from a password.
///
/// The password is stretched with Argon2 (default parameters) under a salt
/// taken from `SHA-256(SALT_DST || user)`, so equal passwords of different
/// users produce unrelated secrets and every guess against a stolen record
/// costs one Argon2 evaluation.
///
/// # Errors
///
/// Returns [`Error::KeyDerivation`] if Argon2 rejects its inputs.
pub fn derive_secret(q: &BigUint, user: &str, password: &str) -> Result<BigUint> {
    let mut hasher = Sha256::new();
    hasher.update(SALT_DST);
    hasher.update(user.as_bytes());
    let digest = hasher.finalize();

    let salt = SaltString::encode_b64(&digest[..16])
        .map_err(|e| Error::KeyDerivation(format!("salt encoding failed: {e}")))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::KeyDerivation(format!("password hashing failed: {e}")))?;

    let output = hash
        .hash
        .ok_or_else(|| Error::KeyDerivation("argon2 produced no output".to_string()))?;

    Ok(BigUint::from_bytes_be(output.as_bytes()) % q)
}
