//! Unpacking of little-endian, LSB-first bit-packed integers.
//!
//! Each call unpacks a full batch (32 values for u32, 64 for u64), so `input`
//! must hold at least `num_bits * size_of::<T>()` bytes.

use num::traits::FromBytes;
use num::PrimInt;

pub fn unpack32(input: &[u8], output: &mut [u32; 32], num_bits: usize) {
    unpack_words::<u32, 4, 32>(input, output, num_bits);
}

pub fn unpack64(input: &[u8], output: &mut [u64; 64], num_bits: usize) {
    unpack_words::<u64, 8, 64>(input, output, num_bits);
}

/// Unpack `WIDTH` values, where `WIDTH` is also the bit width of `T`.
///
/// Values are read a word at a time. A value straddling two words takes its
/// high bits from the next word.
fn unpack_words<T, const BYTES: usize, const WIDTH: usize>(
    input: &[u8],
    output: &mut [T; WIDTH],
    num_bits: usize,
) where
    T: PrimInt + FromBytes<Bytes = [u8; BYTES]>,
{
    assert!(num_bits <= WIDTH, "invalid bit width {num_bits}");
    if num_bits == 0 {
        output.fill(T::zero());
        return;
    }
    assert!(input.len() >= num_bits * BYTES);

    let mask = if num_bits == WIDTH {
        T::max_value()
    } else {
        (T::one() << num_bits) - T::one()
    };

    for (idx, out) in output.iter_mut().enumerate() {
        let start = idx * num_bits;
        let word = start / WIDTH;
        let offset = start % WIDTH;

        let mut val = read_word::<T, BYTES>(input, word) >> offset;
        if offset + num_bits > WIDTH {
            val = val | (read_word::<T, BYTES>(input, word + 1) << (WIDTH - offset));
        }
        *out = val & mask;
    }
}

fn read_word<T, const BYTES: usize>(input: &[u8], idx: usize) -> T
where
    T: FromBytes<Bytes = [u8; BYTES]>,
{
    let mut buf = [0; BYTES];
    buf.copy_from_slice(&input[idx * BYTES..(idx + 1) * BYTES]);
    T::from_le_bytes(&buf)
}
