// src/fluent.rs

//! One-shot convenience façade.
//!
//! Staged builders for the common cases: each stage returns a value that
//! only exposes the next stage's operations, so a half-configured
//! operation cannot run.
//!
//! ```no_run
//! use ctrcrypt::fluent;
//!
//! let secret = fluent::encrypt_string("attack at dawn")
//!     .with_password("correct horse")
//!     .into_bytes()?;
//! let plain = fluent::decrypt_bytes(secret)
//!     .with_password("correct horse")
//!     .into_string()?;
//! # Ok::<(), ctrcrypt::CtrcryptError>(())
//! ```

use crate::consts::DEFAULT_ITERATIONS;
use crate::crypto::kdf::KeyStretcher;
use crate::error::CtrcryptError;
use crate::stream::{CipherConfig, CipherStream};
use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;
use zeroize::Zeroizing;

enum EncryptSource {
    File(PathBuf),
    Bytes(Vec<u8>),
    Text(String),
}

enum DecryptSource {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// Stage 1: encrypt the named file.
pub fn encrypt_file(path: impl Into<PathBuf>) -> Encrypt {
    Encrypt {
        source: EncryptSource::File(path.into()),
    }
}

/// Stage 1: encrypt a byte buffer.
pub fn encrypt_bytes(bytes: impl Into<Vec<u8>>) -> Encrypt {
    Encrypt {
        source: EncryptSource::Bytes(bytes.into()),
    }
}

/// Stage 1: encrypt a UTF-8 string.
pub fn encrypt_string(text: impl Into<String>) -> Encrypt {
    Encrypt {
        source: EncryptSource::Text(text.into()),
    }
}

/// Stage 1: decrypt the named file.
pub fn decrypt_file(path: impl Into<PathBuf>) -> Decrypt {
    Decrypt {
        source: DecryptSource::File(path.into()),
    }
}

/// Stage 1: decrypt a ciphertext buffer.
pub fn decrypt_bytes(bytes: impl Into<Vec<u8>>) -> Decrypt {
    Decrypt {
        source: DecryptSource::Bytes(bytes.into()),
    }
}

#[must_use = "nothing is encrypted until a sink stage runs"]
pub struct Encrypt {
    source: EncryptSource,
}

impl Encrypt {
    /// Stage 2: supply the password. Validation happens at the sink stage.
    #[must_use = "nothing is encrypted until a sink stage runs"]
    pub fn with_password(self, password: impl Into<String>) -> EncryptWithPassword {
        EncryptWithPassword {
            source: self.source,
            password: Zeroizing::new(password.into()),
        }
    }
}

#[must_use = "nothing is encrypted until a sink stage runs"]
pub struct EncryptWithPassword {
    source: EncryptSource,
    password: Zeroizing<String>,
}

impl EncryptWithPassword {
    /// Encrypt into an in-memory ciphertext (header included).
    pub fn into_bytes(self) -> Result<Vec<u8>, CtrcryptError> {
        let stretcher = KeyStretcher::new(&self.password, None, DEFAULT_ITERATIONS)?;
        let mut stream =
            CipherStream::create(Cursor::new(Vec::new()), stretcher, CipherConfig::default())?;
        copy_into(self.source, &mut stream)?;
        stream.flush()?;
        Ok(stream.into_inner().into_inner())
    }

    /// Encrypt into the named file, created or truncated.
    pub fn into_file(self, path: impl Into<PathBuf>) -> Result<(), CtrcryptError> {
        let stretcher = KeyStretcher::new(&self.password, None, DEFAULT_ITERATIONS)?;
        let file = File::create(path.into())?;
        let mut stream = CipherStream::create(file, stretcher, CipherConfig::default())?;
        copy_into(self.source, &mut stream)?;
        stream.flush()?;
        Ok(())
    }
}

#[must_use = "nothing is decrypted until a sink stage runs"]
pub struct Decrypt {
    source: DecryptSource,
}

impl Decrypt {
    /// Stage 2: supply the password. A wrong password is not detected —
    /// decryption completes and yields garbled bytes.
    #[must_use = "nothing is decrypted until a sink stage runs"]
    pub fn with_password(self, password: impl Into<String>) -> DecryptWithPassword {
        DecryptWithPassword {
            source: self.source,
            password: Zeroizing::new(password.into()),
        }
    }
}

#[must_use = "nothing is decrypted until a sink stage runs"]
pub struct DecryptWithPassword {
    source: DecryptSource,
    password: Zeroizing<String>,
}

impl DecryptWithPassword {
    /// Decrypt to plaintext bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>, CtrcryptError> {
        let stretcher = KeyStretcher::new(&self.password, None, DEFAULT_ITERATIONS)?;
        match self.source {
            DecryptSource::File(path) => {
                let file = File::open(path)?;
                read_plaintext(CipherStream::open(file, stretcher, CipherConfig::default())?)
            }
            DecryptSource::Bytes(bytes) => read_plaintext(CipherStream::open(
                Cursor::new(bytes),
                stretcher,
                CipherConfig::default(),
            )?),
        }
    }

    /// Decrypt to a UTF-8 string.
    pub fn into_string(self) -> Result<String, CtrcryptError> {
        String::from_utf8(self.into_bytes()?).map_err(|_| {
            CtrcryptError::Crypto("decrypted bytes are not valid UTF-8 (wrong password?)".into())
        })
    }

    /// Decrypt into the named file, created or truncated.
    pub fn into_file(self, path: impl Into<PathBuf>) -> Result<(), CtrcryptError> {
        let plaintext = self.into_bytes()?;
        let mut file = File::create(path.into())?;
        file.write_all(&plaintext)?;
        Ok(())
    }
}

fn copy_into<W: Write>(source: EncryptSource, dest: &mut W) -> Result<(), CtrcryptError> {
    match source {
        EncryptSource::File(path) => {
            let mut file = File::open(path)?;
            io::copy(&mut file, dest)?;
        }
        EncryptSource::Bytes(bytes) => dest.write_all(&bytes)?,
        EncryptSource::Text(text) => dest.write_all(text.as_bytes())?,
    }
    Ok(())
}

fn read_plaintext<S: Read>(mut stream: CipherStream<S>) -> Result<Vec<u8>, CtrcryptError> {
    let mut plaintext = Vec::new();
    stream.read_to_end(&mut plaintext)?;
    Ok(plaintext)
}
