// src/header.rs

//! Ciphertext header codec.
//!
//! Every ciphertext begins with a compact self-describing header carrying
//! the nonce and password salt needed to rebuild the key schedule and
//! counter sequence:
//!
//! ```text
//! offset  size  field
//! 0       2     header length (big-endian u16) = 4 + N + S
//! 2       2     nonce length  (big-endian u16) = N
//! 4       N     nonce
//! 4+N     2     salt length   (big-endian u16) = S
//! 6+N     S     salt
//! ```
//!
//! The header-length value counts everything after its own two bytes.

use crate::consts::{HEADER_OVERHEAD, MAX_HEADER_LEN};
use crate::error::CtrcryptError;
use crate::wire::{read_octets, read_u16_be, write_u16_be};
use std::io::{Read, Write};

/// Parsed header parameters. Both fields are public wire material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub nonce: Vec<u8>,
    pub salt: Vec<u8>,
}

impl Header {
    /// Total bytes this header occupies on the wire, including the
    /// header-length field itself.
    pub fn wire_len(&self) -> usize {
        2 + HEADER_OVERHEAD + self.nonce.len() + self.salt.len()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), CtrcryptError> {
        let header_len = HEADER_OVERHEAD + self.nonce.len() + self.salt.len();
        if header_len > MAX_HEADER_LEN {
            return Err(CtrcryptError::Argument(format!(
                "salt too large: header would need {header_len} bytes, limit is {MAX_HEADER_LEN}"
            )));
        }
        write_u16_be(writer, header_len as u16)?;
        write_u16_be(writer, self.nonce.len() as u16)?;
        writer.write_all(&self.nonce)?;
        write_u16_be(writer, self.salt.len() as u16)?;
        writer.write_all(&self.salt)?;
        Ok(())
    }

    /// Read and validate a header for a cipher with `block_len`-byte
    /// blocks. The nonce must be between half a block and a whole block
    /// long, and the three length fields must agree.
    pub fn read_from<R: Read>(reader: &mut R, block_len: usize) -> Result<Self, CtrcryptError> {
        let min_nonce = block_len / 2;

        let header_len = usize::from(read_u16_be(reader)?);
        if header_len < HEADER_OVERHEAD + min_nonce {
            return Err(CtrcryptError::Header(format!(
                "header length {header_len} is too small"
            )));
        }

        let nonce_len = usize::from(read_u16_be(reader)?);
        if HEADER_OVERHEAD / 2 + nonce_len > header_len {
            return Err(CtrcryptError::Header(format!(
                "nonce length {nonce_len} does not fit a {header_len}-byte header"
            )));
        }
        if nonce_len < min_nonce || nonce_len > block_len {
            return Err(CtrcryptError::Header(format!(
                "nonce length {nonce_len} outside [{min_nonce}, {block_len}]"
            )));
        }
        let nonce = read_octets(reader, nonce_len)?;

        let salt_len = usize::from(read_u16_be(reader)?);
        if HEADER_OVERHEAD + nonce_len + salt_len != header_len {
            return Err(CtrcryptError::Header(format!(
                "inconsistent header: {HEADER_OVERHEAD} + {nonce_len} + {salt_len} != {header_len}"
            )));
        }
        let salt = read_octets(reader, salt_len)?;

        Ok(Self { nonce, salt })
    }
}
