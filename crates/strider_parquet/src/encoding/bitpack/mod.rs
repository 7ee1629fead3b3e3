pub mod unpack;

use num::PrimInt;
use unpack::{unpack32, unpack64};

pub trait BitPackable: PrimInt + Default {
    type PackedArray: AsRef<[Self]>;

    /// Number of values unpacked per call to `unpack`.
    const BATCH_SIZE: usize;

    fn zero_packed_array() -> Self::PackedArray;

    /// Unpacks bitpacked values into `output`.
    fn unpack(input: &[u8], num_bits: usize, output: &mut Self::PackedArray);

    /// Like `unpack`, but accepts an `input` shorter than a full batch by
    /// treating the missing bytes as zeros.
    ///
    /// Used at the tail of a run where fewer than `BATCH_SIZE` values remain.
    fn unpack_padded(input: &[u8], num_bits: usize, output: &mut Self::PackedArray) {
        let needed = num_bits * Self::BATCH_SIZE / 8;
        if input.len() >= needed {
            Self::unpack(input, num_bits, output);
        } else {
            let mut padded = [0; 64 * 8];
            padded[..input.len()].copy_from_slice(input);
            Self::unpack(&padded[..needed], num_bits, output);
        }
    }
}

impl BitPackable for u32 {
    type PackedArray = [u32; 32];
    const BATCH_SIZE: usize = 32;

    fn zero_packed_array() -> Self::PackedArray {
        [0; 32]
    }

    fn unpack(input: &[u8], num_bits: usize, output: &mut Self::PackedArray) {
        unpack32(input, output, num_bits)
    }
}

impl BitPackable for u64 {
    type PackedArray = [u64; 64];
    const BATCH_SIZE: usize = 64;

    fn zero_packed_array() -> Self::PackedArray {
        [0; 64]
    }

    fn unpack(input: &[u8], num_bits: usize, output: &mut Self::PackedArray) {
        unpack64(input, output, num_bits)
    }
}
