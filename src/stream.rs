// src/stream.rs

//! The cipher filter stream.
//!
//! [`CipherStream`] wraps an underlying byte stream and exposes
//! plaintext-addressed `Read`/`Write`/`Seek` over it: writes are XORed with
//! the CTR keystream on their way to the sink, reads are XORed on their way
//! out of the source. The parameter header ([`Header`]) is written by
//! [`CipherStream::create`] and parsed by [`CipherStream::open`]; the
//! stream position visible to callers starts at zero immediately after it.
//!
//! Decryption with a wrong password does not fail — the XOR simply yields
//! unintended bytes. There is no authentication tag.

use crate::consts::{HEADER_OVERHEAD, MAX_HEADER_LEN};
use crate::crypto::cipher::{AesFactory, CipherFactory};
use crate::crypto::kdf::KeyStretcher;
use crate::crypto::rng::random_octets;
use crate::error::CtrcryptError;
use crate::header::Header;
use crate::keystream::{derive_iv, CtrKeystream};
use std::io::{self, Read, Seek, SeekFrom, Write};
use tracing::debug;

/// Construction parameters for a [`CipherStream`].
///
/// The default configuration is AES + SHA-256, no key-size cap, and a
/// freshly generated nonce.
pub struct CipherConfig {
    /// Produces the block cipher and hash. Swapping the factory changes
    /// the key schedule but not the header layout (for equal block sizes).
    pub factory: Box<dyn CipherFactory>,
    /// Optional cap on the derived key size in bits.
    pub max_key_bits: Option<u32>,
    /// Explicit nonce for `create`; length must lie in
    /// `[block_len / 2, block_len]`. Ignored by `open`.
    pub nonce: Option<Vec<u8>>,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            factory: Box::new(AesFactory),
            max_key_bits: None,
            nonce: None,
        }
    }
}

/// Sinks that can be truncated or extended to an absolute length.
///
/// Generic seekable streams cannot change their length, so `set_len` is
/// only offered where the underlying type supports it.
pub trait Resize {
    fn resize(&mut self, len: u64) -> io::Result<()>;
}

impl Resize for std::fs::File {
    fn resize(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl Resize for io::Cursor<Vec<u8>> {
    fn resize(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds memory"))?;
        self.get_mut().resize(len, 0);
        Ok(())
    }
}

/// Filter stream that encrypts on write and decrypts on read.
///
/// `position` is the plaintext-addressed offset: byte `p` of the plaintext
/// always meets keystream byte `p`, regardless of the access pattern, so
/// sequential and random-access reads decrypt identically.
pub struct CipherStream<S> {
    inner: S,
    stretcher: KeyStretcher,
    factory: Box<dyn CipherFactory>,
    max_key_bits: Option<u32>,
    nonce: Vec<u8>,
    /// Underlying offset of plaintext byte 0 (just past the header).
    start_position: u64,
    /// Plaintext-addressed position of the next read/write.
    position: u64,
    /// Derived lazily on first transform.
    keystream: Option<CtrKeystream>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for CipherStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherStream")
            .field("inner", &self.inner)
            .field("stretcher", &self.stretcher)
            .field("max_key_bits", &self.max_key_bits)
            .field("nonce", &self.nonce)
            .field("start_position", &self.start_position)
            .field("position", &self.position)
            .field("keystream", &self.keystream.is_some())
            .finish()
    }
}

impl<S: Write + Seek> CipherStream<S> {
    /// Start a new ciphertext on `inner` at its current position.
    ///
    /// Writes the parameter header (generating a nonce if the config does
    /// not carry one; the salt comes from `stretcher`) and leaves the
    /// stream positioned at plaintext offset 0.
    pub fn create(
        mut inner: S,
        stretcher: KeyStretcher,
        config: CipherConfig,
    ) -> Result<Self, CtrcryptError> {
        let block_len = config.factory.block_len();
        let CipherConfig {
            factory,
            max_key_bits,
            nonce,
        } = config;

        let salt_len = stretcher.salt().len();
        let nonce = match nonce {
            Some(nonce) => {
                if nonce.len() < block_len / 2 || nonce.len() > block_len {
                    return Err(CtrcryptError::Argument(format!(
                        "nonce length {} outside [{}, {block_len}]",
                        nonce.len(),
                        block_len / 2
                    )));
                }
                if HEADER_OVERHEAD + nonce.len() + salt_len > MAX_HEADER_LEN {
                    return Err(CtrcryptError::Argument(
                        "salt too large for the header length field".into(),
                    ));
                }
                nonce
            }
            None => {
                let available = MAX_HEADER_LEN.saturating_sub(HEADER_OVERHEAD + salt_len);
                if available < block_len / 2 {
                    return Err(CtrcryptError::Argument(
                        "salt too large for the header length field".into(),
                    ));
                }
                random_octets(available.min(block_len))?
            }
        };

        let header = Header {
            nonce,
            salt: stretcher.salt().to_vec(),
        };
        header.write_to(&mut inner)?;
        let start_position = inner.stream_position()?;
        debug!(
            nonce_len = header.nonce.len(),
            salt_len,
            start_position,
            "cipher stream created"
        );

        Ok(Self {
            inner,
            stretcher,
            factory,
            max_key_bits,
            nonce: header.nonce,
            start_position,
            position: 0,
            keystream: None,
        })
    }
}

impl<S: Read + Seek> CipherStream<S> {
    /// Open an existing ciphertext positioned at its header.
    ///
    /// Reads and validates the header; its salt replaces whatever salt
    /// `stretcher` carried. On any header failure the underlying position
    /// is restored to where the read began (best effort) before the error
    /// surfaces.
    pub fn open(
        mut inner: S,
        stretcher: KeyStretcher,
        config: CipherConfig,
    ) -> Result<Self, CtrcryptError> {
        let block_len = config.factory.block_len();
        let CipherConfig {
            factory,
            max_key_bits,
            ..
        } = config;

        let origin = inner.stream_position()?;
        let parsed = Header::read_from(&mut inner, block_len).and_then(|header| {
            let stretcher = stretcher.with_salt(header.salt.clone())?;
            Ok((header, stretcher))
        });
        let (header, stretcher) = match parsed {
            Ok(pair) => pair,
            Err(e) => {
                let _ = inner.seek(SeekFrom::Start(origin));
                return Err(e);
            }
        };

        let start_position = inner.stream_position()?;
        debug!(
            nonce_len = header.nonce.len(),
            salt_len = header.salt.len(),
            start_position,
            "cipher stream opened"
        );

        Ok(Self {
            inner,
            stretcher,
            factory,
            max_key_bits,
            nonce: header.nonce,
            start_position,
            position: 0,
            keystream: None,
        })
    }
}

impl<S> CipherStream<S> {
    /// The per-stream nonce (generated on create, parsed on open).
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// The password salt carried in the header.
    pub fn password_salt(&self) -> &[u8] {
        self.stretcher.salt()
    }

    /// Block length `B` of the configured cipher.
    pub fn block_len(&self) -> usize {
        self.factory.block_len()
    }

    /// Shortest legal nonce: `B / 2`.
    pub fn min_nonce_len(&self) -> usize {
        self.factory.block_len() / 2
    }

    /// Longest legal nonce: `B`.
    pub fn max_nonce_len(&self) -> usize {
        self.factory.block_len()
    }

    /// Current plaintext-addressed position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Consume the stream and return the underlying one.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn ensure_keystream(&mut self) -> Result<&mut CtrKeystream, CtrcryptError> {
        if self.keystream.is_none() {
            let key = self.stretcher.key_for(self.factory.as_ref(), self.max_key_bits)?;
            let iv = derive_iv(self.factory.as_ref(), &self.nonce, self.stretcher.salt());
            let cipher = self.factory.create_cipher(&key, &iv)?;
            self.keystream = Some(CtrKeystream::new(
                cipher,
                &self.nonce,
                self.factory.block_len(),
            ));
        }
        Ok(self
            .keystream
            .as_mut()
            .expect("keystream initialised above"))
    }
}

impl<S: Seek> CipherStream<S> {
    /// Move to plaintext offset `position` (seek from begin).
    pub fn set_position(&mut self, position: u64) -> io::Result<u64> {
        self.seek(SeekFrom::Start(position))
    }

    /// Plaintext length: underlying length minus the header.
    pub fn len(&mut self) -> io::Result<u64> {
        let current = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        if end != current {
            self.inner.seek(SeekFrom::Start(current))?;
        }
        Ok(end.saturating_sub(self.start_position))
    }

    pub fn is_empty(&mut self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<S: Resize> CipherStream<S> {
    /// Set the plaintext length; the underlying stream is resized to
    /// `header + len` bytes.
    pub fn set_len(&mut self, len: u64) -> io::Result<()> {
        self.inner.resize(self.start_position + len)
    }
}

impl<S: Read> Read for CipherStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            let position = self.position;
            let keystream = self.ensure_keystream().map_err(io::Error::other)?;
            keystream.transform(position, &mut buf[..n]);
            self.position += n as u64;
        }
        Ok(n)
    }
}

impl<S: Write> Write for CipherStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        // work on a copy so the caller's buffer stays plaintext
        let mut ciphertext = buf.to_vec();
        let position = self.position;
        let keystream = self.ensure_keystream().map_err(io::Error::other)?;
        keystream.transform(position, &mut ciphertext);
        self.inner.write_all(&ciphertext)?;
        self.position += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<S: Seek> Seek for CipherStream<S> {
    /// Seeks are plaintext-addressed: `Start(o)` lands on plaintext byte
    /// `o`. The result is clamped so the underlying stream never lands
    /// inside the header. Returns the plaintext-relative position.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let mapped = match pos {
            SeekFrom::Start(offset) => {
                let absolute = self.start_position.checked_add(offset).ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "seek offset overflows u64")
                })?;
                SeekFrom::Start(absolute)
            }
            other => other,
        };
        let mut landed = self.inner.seek(mapped)?;
        if landed < self.start_position {
            landed = self.inner.seek(SeekFrom::Start(self.start_position))?;
        }
        self.position = landed - self.start_position;
        Ok(self.position)
    }
}
