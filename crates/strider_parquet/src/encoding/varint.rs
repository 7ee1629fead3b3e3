//! Variable length integers used in run headers and delta encoding headers.
//!
//! Unsigned values are ULEB128, signed values are zigzag mapped first.
use strider_error::{Result, StriderError};

/// Max bytes needed for a u64.
const MAX_ULEB128_LEN: usize = 10;

/// Append `value` as ULEB128 to `buf`.
pub fn put_uleb128(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Append `value` zigzag mapped and ULEB128 encoded to `buf`.
pub fn put_zigzag(buf: &mut Vec<u8>, value: i64) {
    put_uleb128(buf, ((value << 1) ^ (value >> 63)) as u64)
}

/// Read a ULEB128 value from the front of `buf`.
///
/// Returns the value and the number of bytes it took up.
pub fn read_uleb128(buf: &[u8]) -> Result<(u64, usize)> {
    let mut value = 0u64;

    for (idx, &byte) in buf.iter().enumerate().take(MAX_ULEB128_LEN) {
        let bits = (byte & 0x7F) as u64;
        let shift = idx * 7;
        if shift == 63 && bits > 1 {
            return Err(StriderError::malformed("ULEB128 value overflows u64"));
        }
        value |= bits << shift;

        if byte & 0x80 == 0 {
            return Ok((value, idx + 1));
        }
    }

    if buf.len() >= MAX_ULEB128_LEN {
        Err(StriderError::malformed("ULEB128 value overflows u64"))
    } else {
        Err(StriderError::malformed("Truncated ULEB128 value"))
    }
}

/// Read a zigzag encoded value from the front of `buf`.
pub fn read_zigzag(buf: &[u8]) -> Result<(i64, usize)> {
    let (v, n) = read_uleb128(buf)?;
    Ok(((v >> 1) as i64 ^ -((v & 1) as i64), n))
}
