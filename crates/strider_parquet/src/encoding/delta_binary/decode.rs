//! DELTA_BINARY_PACKED value decoding.
//!
//! Layout: a header of `<block size> <miniblocks per block> <total values>
//! <first value>`, followed by blocks. Each block holds its min delta, one bit
//! width per miniblock, then the miniblocks themselves. Deltas are stored
//! relative to the block's min delta.

use strider_error::{Result, StriderError};

use crate::encoding::bitpack::BitPackable;
use crate::encoding::varint::{read_uleb128, read_zigzag};

/// Largest block size accepted in a header. Writers use 128.
const MAX_BLOCK_SIZE: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    block_size: usize,
    miniblocks_per_block: usize,
    total_values: usize,
    first_value: i64,
}

impl Header {
    fn read(buf: &mut &[u8]) -> Result<Self> {
        let block_size = take_uleb128(buf)? as usize;
        let miniblocks_per_block = take_uleb128(buf)? as usize;
        let total_values = take_uleb128(buf)? as usize;
        let first_value = take_zigzag(buf)?;

        if block_size == 0 || block_size % 128 != 0 || block_size > MAX_BLOCK_SIZE {
            return Err(StriderError::malformed(format!(
                "Delta block size must be a multiple of 128 no larger than {MAX_BLOCK_SIZE}, got {block_size}"
            )));
        }
        if miniblocks_per_block == 0
            || block_size % miniblocks_per_block != 0
            || (block_size / miniblocks_per_block) % 32 != 0
        {
            return Err(StriderError::malformed(format!(
                "Delta miniblock size must be a multiple of 32, got {miniblocks_per_block} miniblocks for block size {block_size}"
            )));
        }

        Ok(Header {
            block_size,
            miniblocks_per_block,
            total_values,
            first_value,
        })
    }

    fn values_per_miniblock(&self) -> usize {
        self.block_size / self.miniblocks_per_block
    }
}

fn take_uleb128(buf: &mut &[u8]) -> Result<u64> {
    let (v, n) = read_uleb128(buf)?;
    *buf = &buf[n..];
    Ok(v)
}

fn take_zigzag(buf: &mut &[u8]) -> Result<i64> {
    let (v, n) = read_zigzag(buf)?;
    *buf = &buf[n..];
    Ok(v)
}

/// Decodes delta packed values as i64.
///
/// Int32 columns are decoded through this too. Arithmetic wraps, so truncating
/// the results to i32 gives the same values as decoding in 32 bits.
#[derive(Debug)]
pub struct Decoder<'a> {
    header: Header,
    /// Everything after the header.
    blocks: &'a [u8],
}

impl<'a> Decoder<'a> {
    /// Read the header from the front of `buf`, the values section of a page.
    pub fn try_new(mut buf: &'a [u8]) -> Result<Self> {
        let header = Header::read(&mut buf)?;

        // Every block takes at least its min delta and bit widths, which caps
        // how many values the remaining bytes can describe.
        let blocks_needed = header
            .total_values
            .saturating_sub(1)
            .div_ceil(header.block_size);
        let blocks_available = buf.len() / (1 + header.miniblocks_per_block);
        if blocks_needed > blocks_available {
            return Err(StriderError::malformed(format!(
                "Delta header claims {} values, but only {} bytes of blocks follow",
                header.total_values,
                buf.len()
            )));
        }

        Ok(Decoder {
            header,
            blocks: buf,
        })
    }

    pub fn total_values(&self) -> usize {
        self.header.total_values
    }

    /// Decode all values, appending them to `out`.
    pub fn decode_values(&mut self, out: &mut Vec<i64>) -> Result<()> {
        let total = self.header.total_values;
        if total == 0 {
            return Ok(());
        }

        let mut prev = self.header.first_value;
        out.push(prev);
        let mut remaining = total - 1;

        while remaining > 0 {
            let decoded = self.decode_block(&mut prev, remaining, out)?;
            if decoded == 0 {
                return Err(StriderError::malformed("Delta block contained no values"));
            }
            remaining -= decoded;
        }

        Ok(())
    }

    /// Decode up to `remaining` values from the next block.
    ///
    /// Trailing miniblocks past the last value may be absent or hold
    /// garbage, both are ignored.
    fn decode_block(&mut self, prev: &mut i64, remaining: usize, out: &mut Vec<i64>) -> Result<usize> {
        let min_delta = take_zigzag(&mut self.blocks)?;

        let num_miniblocks = self.header.miniblocks_per_block;
        if self.blocks.len() < num_miniblocks {
            return Err(StriderError::malformed("Delta block missing bit widths"));
        }
        let (bit_widths, rest) = self.blocks.split_at(num_miniblocks);
        self.blocks = rest;

        let per_miniblock = self.header.values_per_miniblock();
        let mut batch = u64::zero_packed_array();
        let mut decoded = 0;

        for &bit_width in bit_widths {
            let want = (remaining - decoded).min(per_miniblock);
            if want == 0 {
                break;
            }

            let bit_width = bit_width as usize;
            if bit_width > 64 {
                return Err(StriderError::malformed(format!(
                    "Invalid miniblock bit width: {bit_width}"
                )));
            }

            // Writers may cut the final miniblock short, only the bytes for
            // the values we want need to be present.
            let full_len = bit_width
                .checked_mul(per_miniblock)
                .ok_or_else(|| StriderError::malformed("Delta miniblock size overflows"))?
                / 8;
            let miniblock = &self.blocks[..full_len.min(self.blocks.len())];
            if miniblock.len() < (bit_width * want).div_ceil(8) {
                return Err(StriderError::malformed("Delta miniblock truncated"));
            }

            for start in (0..want).step_by(u64::BATCH_SIZE) {
                let offset = (start * bit_width / 8).min(miniblock.len());
                u64::unpack_padded(&miniblock[offset..], bit_width, &mut batch);

                let n = (want - start).min(u64::BATCH_SIZE);
                for &delta in &batch[..n] {
                    *prev = prev.wrapping_add(min_delta).wrapping_add(delta as i64);
                    out.push(*prev);
                }
            }

            self.blocks = &self.blocks[miniblock.len()..];
            decoded += want;
        }

        Ok(decoded)
    }
}
