//! Primitive agent protocol types: big-endian integers and
//! length-prefixed byte strings.
//!
//! Readers advance over the consumed bytes. A field that declares more
//! bytes than the reader holds fails with [`ProtoError::Truncated`]
//! before anything is consumed.

use byteorder::{BigEndian, ByteOrder};
use ssh_encoding::{Encode, Reader, Writer};

use super::error::{ProtoError, ProtoResult};

/// Size of the length prefix of strings and frames.
pub const LENGTH_SIZE: usize = 4;

/// Append a big-endian `u32`.
pub fn write_u32(writer: &mut impl Writer, value: u32) -> ssh_encoding::Result<()> {
    value.encode(writer)
}

/// Append a single byte.
pub fn write_byte(writer: &mut impl Writer, value: u8) -> ssh_encoding::Result<()> {
    value.encode(writer)
}

/// Append `bytes` prefixed with their length as a big-endian `u32`.
pub fn write_string(writer: &mut impl Writer, bytes: &[u8]) -> ssh_encoding::Result<()> {
    bytes.encode(writer)
}

/// Encoded size of a string holding `len` bytes.
pub fn string_len(len: usize) -> ssh_encoding::Result<usize> {
    LENGTH_SIZE
        .checked_add(len)
        .ok_or(ssh_encoding::Error::Overflow)
}

fn read_exact(reader: &mut impl Reader, out: &mut [u8]) -> ProtoResult<()> {
    let remaining = reader.remaining_len();
    if out.len() > remaining {
        return Err(ProtoError::Truncated {
            needed: out.len(),
            remaining,
        });
    }
    reader.read(out)?;
    Ok(())
}

/// Read a big-endian `u32`.
pub fn read_u32(reader: &mut impl Reader) -> ProtoResult<u32> {
    let mut bytes = [0; LENGTH_SIZE];
    read_exact(reader, &mut bytes)?;
    Ok(BigEndian::read_u32(&bytes))
}

/// Read a single byte.
pub fn read_byte(reader: &mut impl Reader) -> ProtoResult<u8> {
    let mut byte = [0; 1];
    read_exact(reader, &mut byte)?;
    Ok(byte[0])
}

/// Read a length-prefixed string.
///
/// The declared length is checked against the bytes left in `reader`
/// before any buffer is allocated for it.
pub fn read_string(reader: &mut impl Reader) -> ProtoResult<Vec<u8>> {
    let len = read_u32(reader)? as usize;
    let remaining = reader.remaining_len();
    if len > remaining {
        return Err(ProtoError::Truncated {
            needed: len,
            remaining,
        });
    }
    let mut bytes = vec![0; len];
    reader.read(&mut bytes)?;
    Ok(bytes)
}
