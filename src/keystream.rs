// src/keystream.rs

//! Seekable CTR keystream generator.
//!
//! The keystream for byte offset `p` is byte `p` of the virtual stream
//! formed by concatenating ECB encryptions of successive counter blocks.
//! Counter block `k` is the seed block (nonce prefix, zero-padded) with the
//! 1-based counter `k + 1` XOR-folded into its tail, least-significant byte
//! last. Pads are produced in batches of [`PAD_BATCH_LEN`] bytes and
//! cached, so sequential, random-access, and split transforms all observe
//! identical keystream bytes.

use crate::consts::PAD_BATCH_LEN;
use crate::crypto::cipher::{BlockEncryptor, CipherFactory};
use crate::wire::fill;
use tracing::trace;
use zeroize::Zeroizing;

/// Derive the initialization vector handed to the cipher factory.
///
/// `iv = fill(hash(nonce ∥ salt))`, truncated or tiled to the block
/// length. A true ECB cipher ignores it; it exists for cipher setups that
/// consume an IV at construction.
pub fn derive_iv(factory: &dyn CipherFactory, nonce: &[u8], salt: &[u8]) -> Vec<u8> {
    let mut seed = Vec::with_capacity(nonce.len() + salt.len());
    seed.extend_from_slice(nonce);
    seed.extend_from_slice(salt);
    let digest = factory.hash(&seed);
    let mut iv = vec![0u8; factory.block_len()];
    fill(&mut iv, &digest);
    iv
}

/// Batched CTR pad generator.
///
/// Holds the ECB encryptor, the counter seed block, and one encrypted pad
/// batch covering the block range `[start_block, end_block)`. The counter
/// is a `u64` block index, which bounds usable streams at `2^64` blocks —
/// about 2.9 × 10^20 bytes for AES, far beyond any practical file.
///
/// The pad buffer is zeroed on drop.
pub struct CtrKeystream {
    cipher: Box<dyn BlockEncryptor>,
    block_len: usize,
    ctr_seed: Vec<u8>,
    pad: Zeroizing<Vec<u8>>,
    start_block: u64,
    end_block: u64,
}

impl CtrKeystream {
    /// Build a generator from an ECB encryptor and the stream nonce.
    ///
    /// The seed block carries the first `min(nonce_len, 8)` nonce bytes;
    /// the rest of the block is zero and receives the counter.
    pub fn new(cipher: Box<dyn BlockEncryptor>, nonce: &[u8], block_len: usize) -> Self {
        let mut ctr_seed = vec![0u8; block_len];
        let prefix = nonce.len().min(8).min(block_len);
        ctr_seed[..prefix].copy_from_slice(&nonce[..prefix]);

        let blocks_per_batch = (PAD_BATCH_LEN / block_len).max(1);
        Self {
            cipher,
            block_len,
            ctr_seed,
            pad: Zeroizing::new(vec![0u8; blocks_per_batch * block_len]),
            start_block: 0,
            end_block: 0,
        }
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// XOR the keystream into `data` in place, starting at plaintext byte
    /// offset `position`.
    ///
    /// XOR makes this an involution: transforming twice at the same
    /// position restores the original bytes, so the same call serves
    /// encryption and decryption.
    pub fn transform(&mut self, position: u64, data: &mut [u8]) {
        let block_len = self.block_len as u64;
        let mut pos = position;
        let mut offset = 0usize;
        while offset < data.len() {
            let block = pos / block_len;
            if block < self.start_block || block >= self.end_block {
                self.refill(block);
            }
            let pad_index = (pos - self.start_block * block_len) as usize;
            let take = (self.pad.len() - pad_index).min(data.len() - offset);
            for (byte, pad) in data[offset..offset + take]
                .iter_mut()
                .zip(&self.pad[pad_index..pad_index + take])
            {
                *byte ^= *pad;
            }
            pos += take as u64;
            offset += take;
        }
    }

    /// Recompute the pad batch covering `block`.
    ///
    /// Batches are aligned: the batch containing `block` always starts at
    /// a multiple of the batch size, so a given block index yields the same
    /// pad bytes regardless of which access produced the batch.
    fn refill(&mut self, block: u64) {
        let blocks_per_batch = (self.pad.len() / self.block_len) as u64;
        let start = (block / blocks_per_batch) * blocks_per_batch;

        for (index, chunk) in self.pad.chunks_exact_mut(self.block_len).enumerate() {
            chunk.copy_from_slice(&self.ctr_seed);
            // 1-based counter, folded in from the last byte backwards
            let mut counter = start + index as u64 + 1;
            let mut at = chunk.len();
            while counter != 0 && at > 0 {
                at -= 1;
                chunk[at] ^= (counter & 0xff) as u8;
                counter >>= 8;
            }
        }
        self.cipher.encrypt_blocks(&mut self.pad);
        self.start_block = start;
        self.end_block = start + blocks_per_batch;
        trace!(start_block = start, blocks = blocks_per_batch, "pad batch refilled");
    }
}
