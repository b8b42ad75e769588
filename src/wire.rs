// src/wire.rs

//! Byte-order helpers for the header codec.
//!
//! All multi-byte integers on the wire are big-endian. Short reads are
//! reported as header errors naming the byte count that was expected.

use crate::error::CtrcryptError;
use std::io::{Read, Write};

/// Read exactly two bytes and decode them as a big-endian u16.
pub fn read_u16_be<R: Read>(reader: &mut R) -> Result<u16, CtrcryptError> {
    let mut buf = [0u8; 2];
    read_into(reader, &mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

/// Write a u16 as two big-endian bytes.
pub fn write_u16_be<W: Write>(writer: &mut W, value: u16) -> Result<(), CtrcryptError> {
    writer.write_all(&value.to_be_bytes())?;
    Ok(())
}

/// Read exactly `len` bytes into a fresh buffer.
pub fn read_octets<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>, CtrcryptError> {
    let mut buf = vec![0u8; len];
    read_into(reader, &mut buf)?;
    Ok(buf)
}

fn read_into<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), CtrcryptError> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            CtrcryptError::Header(format!("unable to read {} bytes", buf.len()))
        } else {
            CtrcryptError::Io(e)
        }
    })
}

/// Fill `dest` by tiling `pattern` across it.
///
/// A pattern shorter than `dest` repeats periodically (copied with
/// geometric doubling, so already-written bytes serve as the source for
/// later copies). A longer pattern contributes only its prefix.
pub fn fill(dest: &mut [u8], pattern: &[u8]) {
    if dest.is_empty() || pattern.is_empty() {
        return;
    }
    let seed = dest.len().min(pattern.len());
    dest[..seed].copy_from_slice(&pattern[..seed]);
    let mut filled = seed;
    while filled < dest.len() {
        let take = filled.min(dest.len() - filled);
        let (src, rest) = dest.split_at_mut(filled);
        rest[..take].copy_from_slice(&src[..take]);
        filled += take;
    }
}
