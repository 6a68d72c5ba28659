use crate::index::types::{MAX_STORED_TERM_LEN, TERM_FIELD_WIDTH};
use std::io::{self, Write};

/// Encode a term into its fixed-width lookup field.
///
/// The field always ends with at least one NUL byte, so terms longer than
/// `MAX_STORED_TERM_LEN` bytes are cut and shorter ones are zero padded.
pub fn encode_term_field(term: &str) -> [u8; TERM_FIELD_WIDTH] {
    let mut field = [0u8; TERM_FIELD_WIDTH];
    let bytes = stored_term_bytes(term);
    field[..bytes.len()].copy_from_slice(bytes);
    field
}

/// Decode a fixed-width term field up to its first NUL byte
pub fn decode_term_field(field: &[u8]) -> String {
    String::from_utf8_lossy(term_field_bytes(field)).into_owned()
}

/// The part of `term` that fits in a lookup field
pub fn stored_term_bytes(term: &str) -> &[u8] {
    let bytes = term.as_bytes();
    &bytes[..bytes.len().min(MAX_STORED_TERM_LEN)]
}

/// Bytes of a term field up to its first NUL byte
pub fn term_field_bytes(field: &[u8]) -> &[u8] {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    &field[..end]
}

/// Write a u32 in little-endian format
pub fn write_u32_le<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Read a little-endian u32 at `pos`, if the slice is long enough
pub fn u32_le_at(buf: &[u8], pos: usize) -> Option<u32> {
    let bytes = buf.get(pos..pos.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
