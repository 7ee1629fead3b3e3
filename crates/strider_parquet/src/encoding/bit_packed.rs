//! Deprecated BIT_PACKED encoding, only valid for levels.
//!
//! Unlike the hybrid encoding there's no length prefix, and values are packed
//! from the most significant bit first. The encoded size is determined by the
//! number of values: `ceil(num_values * bit_width / 8)` bytes.

use bytes::Bytes;
use strider_error::{Result, StriderError};

use super::{Decoder, Encoding};

#[derive(Debug, Clone, Copy, Default)]
pub struct BitPackedDecoder;

impl Decoder for BitPackedDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::BitPacked
    }

    fn set_data(&mut self, _data: Bytes) -> Result<()> {
        Err(StriderError::unsupported(
            "BIT_PACKED encoding is only supported for levels",
        ))
    }

    fn decode_levels(&mut self, buf: &mut Bytes, bit_width: u8, out: &mut [u16]) -> Result<usize> {
        if bit_width > 16 {
            return Err(StriderError::malformed(format!(
                "Invalid bit width for levels: {bit_width}"
            )));
        }

        let bit_width = bit_width as usize;
        if bit_width == 0 {
            out.fill(0);
            return Ok(out.len());
        }

        let num_bytes = (out.len() * bit_width).div_ceil(8).min(buf.len());
        let num_values = out.len().min(num_bytes * 8 / bit_width);

        let packed = buf.split_to(num_bytes);

        let mut bit = 0;
        for out in &mut out[..num_values] {
            let mut v = 0u16;
            for _ in 0..bit_width {
                let byte = packed[bit / 8];
                let set = (byte >> (7 - bit % 8)) & 1;
                v = (v << 1) | set as u16;
                bit += 1;
            }
            *out = v;
        }

        Ok(num_values)
    }
}
