//! # Error Types
//!
//! This module defines the error type used throughout the library.
//! All fallible operations return [`Result<T, CtrcryptError>`](CtrcryptError).

use thiserror::Error;

/// The error type for all ctrcrypt operations.
///
/// Covers I/O errors, argument validation, header parsing, and
/// cryptographic failures. Note that a wrong password is *not* an error:
/// CTR decryption with the wrong key completes and yields garbled bytes.
#[derive(Error, Debug)]
pub enum CtrcryptError {
    /// I/O error from the underlying stream.
    ///
    /// Wraps [`std::io::Error`]; created automatically when reads, writes,
    /// or seeks on the underlying stream fail.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid caller-supplied argument.
    ///
    /// Empty password, salt shorter than 8 bytes, nonce outside the legal
    /// length range, oversized salt, or a key-size cap no legal key size
    /// fits under.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Header parsing or validation error.
    ///
    /// Inconsistent length fields, nonce length outside `[B/2, B]`, or a
    /// header/body truncated before the advertised byte count.
    #[error("Header error: {0}")]
    Header(String),

    /// Cryptographic operation failed.
    ///
    /// KDF derivation failures, cipher construction with an unusable key,
    /// RNG failures, or decrypted text that is not valid UTF-8.
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<&'static str> for CtrcryptError {
    fn from(msg: &'static str) -> Self {
        CtrcryptError::Crypto(msg.to_string())
    }
}
