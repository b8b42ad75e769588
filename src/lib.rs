// src/lib.rs

//! Password-based streaming encryption over a seekable CTR keystream.
//!
//! Ciphertexts start with a compact self-describing header (nonce and
//! password salt, see [`header`]), followed by the plaintext XORed with an
//! AES-CTR pad. The pad is derived from the password via PBKDF2
//! ([`KeyStretcher`]) and is seekable: any byte offset can be encrypted or
//! decrypted independently, which is what makes [`CipherStream`] a proper
//! random-access filter over files.
//!
//! This is confidentiality-only. There is no authentication tag: a wrong
//! password (or a tampered ciphertext) decrypts to garbage rather than an
//! error.

pub mod consts;
pub mod crypto;
pub mod error;
pub mod fluent;
pub mod header;
pub mod keystream;
pub mod stream;
pub mod wire;

// High-level API — this is what most users import
pub use fluent::{decrypt_bytes, decrypt_file, encrypt_bytes, encrypt_file, encrypt_string};

// Core stream layer for callers that manage their own I/O
pub use crypto::cipher::{AesFactory, BlockEncryptor, CipherFactory, KeySizeLadder};
pub use crypto::kdf::{KeyStretcher, Prf};
pub use error::CtrcryptError;
pub use stream::{CipherConfig, CipherStream, Resize};
