// src/consts.rs

//! Global constants: wire-format sizes and key-derivation defaults.

/// Preferred keystream pad batch length in bytes. Counter blocks are
/// encrypted in runs of this many bytes and cached.
pub const PAD_BATCH_LEN: usize = 4096;

/// Header overhead: the two u16 length fields (nonce length, salt length)
/// counted inside the header-length value.
pub const HEADER_OVERHEAD: usize = 4;

/// Largest value the u16 header-length field can carry.
pub const MAX_HEADER_LEN: usize = u16::MAX as usize;

/// Default PBKDF2 iteration count (RFC 2898 recommendation era; kept for
/// wire compatibility with existing files).
pub const DEFAULT_ITERATIONS: u32 = 10_000;

/// Default salt size in bytes.
pub const DEFAULT_SALT_LEN: usize = 16;

/// Minimum salt size accepted by the key stretcher.
pub const MIN_SALT_LEN: usize = 8;
