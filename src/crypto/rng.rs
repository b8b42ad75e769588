// src/crypto/rng.rs

//! Secure randomness for nonces and salts, backed by the OS RNG.

use crate::error::CtrcryptError;
use rand::{rngs::OsRng, TryRngCore};

/// Fill `dest` with cryptographically secure random bytes.
pub fn fill_random(dest: &mut [u8]) -> Result<(), CtrcryptError> {
    OsRng
        .try_fill_bytes(dest)
        .map_err(|e| CtrcryptError::Crypto(format!("OS RNG failure: {e}")))
}

/// Allocate a fresh buffer of `len` secure random bytes.
pub fn random_octets(len: usize) -> Result<Vec<u8>, CtrcryptError> {
    let mut buf = vec![0u8; len];
    fill_random(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_octets_are_not_constant() {
        let a = random_octets(16).unwrap();
        let b = random_octets(16).unwrap();
        assert_eq!(a.len(), 16);
        // 2^-128 false-failure probability
        assert_ne!(a, b);
    }
}
