// src/crypto/kdf.rs

//! Password key stretching via PBKDF2 (RFC 2898).

use crate::consts::{DEFAULT_SALT_LEN, MIN_SALT_LEN};
use crate::crypto::cipher::CipherFactory;
use crate::crypto::rng::random_octets;
use crate::error::CtrcryptError;
use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use zeroize::Zeroizing;

/// HMAC family used as the PBKDF2 PRF.
///
/// The header does not record the PRF, so files are only readable with the
/// PRF they were written with. [`Prf::Sha1`] is the RFC 2898 default and
/// the wire-compatible choice; the others are a private-format opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Prf {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

/// Derives a cipher key from a password and salt.
///
/// The password is held only as long as the stretcher lives and is zeroed
/// on drop. The salt is public: it is written into the ciphertext header
/// on encrypt and read back from it on decrypt.
pub struct KeyStretcher {
    password: Zeroizing<Vec<u8>>,
    salt: Vec<u8>,
    iterations: u32,
    prf: Prf,
}

impl std::fmt::Debug for KeyStretcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStretcher")
            .field("password", &"<redacted>")
            .field("salt", &self.salt)
            .field("iterations", &self.iterations)
            .field("prf", &self.prf)
            .finish()
    }
}

impl KeyStretcher {
    /// Build a stretcher from a UTF-8 password.
    ///
    /// A missing salt is generated: [`DEFAULT_SALT_LEN`] random bytes. A
    /// supplied salt must be at least [`MIN_SALT_LEN`] bytes.
    pub fn new(
        password: &str,
        salt: Option<Vec<u8>>,
        iterations: u32,
    ) -> Result<Self, CtrcryptError> {
        Self::from_parts(password.as_bytes().to_vec(), salt, iterations)
    }

    /// Build a stretcher from raw password bytes.
    pub fn from_parts(
        password: impl Into<Vec<u8>>,
        salt: Option<Vec<u8>>,
        iterations: u32,
    ) -> Result<Self, CtrcryptError> {
        let password = Zeroizing::new(password.into());
        if password.is_empty() {
            return Err(CtrcryptError::Argument("password must not be empty".into()));
        }
        if iterations == 0 {
            return Err(CtrcryptError::Argument(
                "PBKDF2 iterations must be at least 1".into(),
            ));
        }
        let salt = match salt {
            Some(salt) => {
                Self::check_salt(&salt)?;
                salt
            }
            None => random_octets(DEFAULT_SALT_LEN)?,
        };
        Ok(Self {
            password,
            salt,
            iterations,
            prf: Prf::default(),
        })
    }

    /// Replace the salt, e.g. with one read from a ciphertext header.
    pub fn with_salt(mut self, salt: Vec<u8>) -> Result<Self, CtrcryptError> {
        Self::check_salt(&salt)?;
        self.salt = salt;
        Ok(self)
    }

    /// Select a non-default PRF family.
    #[must_use]
    pub fn with_prf(mut self, prf: Prf) -> Self {
        self.prf = prf;
        self
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    pub const fn prf(&self) -> Prf {
        self.prf
    }

    /// Derive a key for `factory`'s cipher.
    ///
    /// Picks the largest size on the cipher's key-size ladder that does not
    /// exceed `max_bits` (no cap when `None`), walking down from the
    /// maximum in `skip_bits` steps. Fails when no ladder size fits under
    /// the cap or the chosen size is not a whole number of bytes.
    pub fn key_for(
        &self,
        factory: &dyn CipherFactory,
        max_bits: Option<u32>,
    ) -> Result<Zeroizing<Vec<u8>>, CtrcryptError> {
        let ladder = factory.key_sizes();
        let mut bits = ladder.max_bits;
        if let Some(cap) = max_bits {
            while bits > cap {
                if bits <= ladder.min_bits || ladder.skip_bits == 0 {
                    return Err(CtrcryptError::Argument(format!(
                        "no legal key size fits under a {cap}-bit cap"
                    )));
                }
                bits -= ladder.skip_bits;
            }
        }
        if bits % 8 != 0 {
            return Err(CtrcryptError::Argument(format!(
                "key size {bits} is not a multiple of 8 bits"
            )));
        }

        let mut key = Zeroizing::new(vec![0u8; bits as usize / 8]);
        match self.prf {
            Prf::Sha1 => pbkdf2::<Hmac<Sha1>>(&self.password, &self.salt, self.iterations, &mut key),
            Prf::Sha256 => {
                pbkdf2::<Hmac<Sha256>>(&self.password, &self.salt, self.iterations, &mut key)
            }
            Prf::Sha512 => {
                pbkdf2::<Hmac<Sha512>>(&self.password, &self.salt, self.iterations, &mut key)
            }
        }
        .map_err(|e| CtrcryptError::Crypto(format!("PBKDF2 failed: {e}")))?;
        Ok(key)
    }

    fn check_salt(salt: &[u8]) -> Result<(), CtrcryptError> {
        if salt.len() < MIN_SALT_LEN {
            return Err(CtrcryptError::Argument(format!(
                "salt must be at least {MIN_SALT_LEN} bytes, got {}",
                salt.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::AesFactory;

    #[test]
    fn default_salt_is_generated() {
        let stretcher = KeyStretcher::new("pw", None, 1).unwrap();
        assert_eq!(stretcher.salt().len(), DEFAULT_SALT_LEN);
    }

    #[test]
    fn short_salt_rejected() {
        let err = KeyStretcher::new("pw", Some(vec![0u8; 7]), 1).unwrap_err();
        assert!(matches!(err, CtrcryptError::Argument(_)));
    }

    #[test]
    fn empty_password_rejected() {
        let err = KeyStretcher::new("", None, 1).unwrap_err();
        assert!(matches!(err, CtrcryptError::Argument(_)));
    }

    #[test]
    fn ladder_walks_down_under_cap() {
        let stretcher = KeyStretcher::new("pw", Some(vec![1u8; 8]), 1).unwrap();
        assert_eq!(stretcher.key_for(&AesFactory, None).unwrap().len(), 32);
        assert_eq!(stretcher.key_for(&AesFactory, Some(256)).unwrap().len(), 32);
        assert_eq!(stretcher.key_for(&AesFactory, Some(255)).unwrap().len(), 24);
        assert_eq!(stretcher.key_for(&AesFactory, Some(128)).unwrap().len(), 16);
        let err = stretcher.key_for(&AesFactory, Some(100)).unwrap_err();
        assert!(matches!(err, CtrcryptError::Argument(_)));
    }

    #[test]
    fn prf_families_disagree() {
        let salt = vec![9u8; 16];
        let sha1 = KeyStretcher::new("pw", Some(salt.clone()), 3)
            .unwrap()
            .key_for(&AesFactory, None)
            .unwrap();
        let sha256 = KeyStretcher::new("pw", Some(salt), 3)
            .unwrap()
            .with_prf(Prf::Sha256)
            .key_for(&AesFactory, None)
            .unwrap();
        assert_ne!(*sha1, *sha256);
    }
}
