//! RLE/bit-packing hybrid encoding.
//!
//! See <https://github.com/apache/parquet-format/blob/master/Encodings.md#run-length-encoding--bit-packing-hybrid-rle--3>
//!
//! In data page v1 both level streams and RLE encoded booleans are prefixed
//! with the length of the encoded data as a 4 byte little endian integer.

use bytes::{Buf, Bytes};
use strider_error::{Result, StriderError};

use super::bitpack::BitPackable;
use super::varint::read_uleb128;
use super::{Decoder, Encoding};

#[derive(Debug, Default)]
pub struct RleDecoder {
    /// Reader for boolean values, set by `set_data`.
    values: Option<HybridReader>,
}

impl Decoder for RleDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::Rle
    }

    fn set_data(&mut self, mut data: Bytes) -> Result<()> {
        let data = take_length_prefixed(&mut data)?;
        self.values = Some(HybridReader::new(data, 1));
        Ok(())
    }

    fn decode_levels(&mut self, buf: &mut Bytes, bit_width: u8, out: &mut [u16]) -> Result<usize> {
        if bit_width > 16 {
            return Err(StriderError::malformed(format!(
                "Invalid bit width for levels: {bit_width}"
            )));
        }

        let data = take_length_prefixed(buf)?;
        let mut reader = HybridReader::new(data, bit_width);

        for (idx, out) in out.iter_mut().enumerate() {
            match reader.next_value()? {
                Some(v) => *out = v as u16,
                None => return Ok(idx),
            }
        }

        Ok(out.len())
    }

    fn decode_bool(&mut self) -> Result<bool> {
        let reader = match self.values.as_mut() {
            Some(reader) => reader,
            None => return Err(StriderError::new("RLE decoder not bound to data")),
        };

        match reader.next_value()? {
            Some(v) => Ok(v == 1),
            None => Err(StriderError::malformed("RLE booleans ran out of data")),
        }
    }
}

/// Split off the length prefixed section at the front of `buf`.
fn take_length_prefixed(buf: &mut Bytes) -> Result<Bytes> {
    if buf.remaining() < 4 {
        return Err(StriderError::malformed(
            "Not enough data for RLE length prefix",
        ));
    }
    let len = buf.get_u32_le() as usize;
    if buf.remaining() < len {
        return Err(StriderError::malformed(format!(
            "RLE data length {len} exceeds remaining page data {}",
            buf.remaining()
        )));
    }
    Ok(buf.split_to(len))
}

#[derive(Debug)]
enum Run {
    /// Same value repeated.
    Repeated { value: u32, remaining: usize },
    /// Values unpacked from a bit-packed run.
    Packed { values: Vec<u32>, pos: usize },
}

/// Reads values one at a time out of hybrid encoded data.
#[derive(Debug)]
struct HybridReader {
    data: Bytes,
    bit_width: u8,
    run: Option<Run>,
}

impl HybridReader {
    fn new(data: Bytes, bit_width: u8) -> Self {
        HybridReader {
            data,
            bit_width,
            run: None,
        }
    }

    /// Get the next value, `None` once all data is consumed.
    fn next_value(&mut self) -> Result<Option<u32>> {
        loop {
            match &mut self.run {
                Some(Run::Repeated { value, remaining }) if *remaining > 0 => {
                    *remaining -= 1;
                    return Ok(Some(*value));
                }
                Some(Run::Packed { values, pos }) if *pos < values.len() => {
                    let v = values[*pos];
                    *pos += 1;
                    return Ok(Some(v));
                }
                _ => {
                    if !self.next_run()? {
                        return Ok(None);
                    }
                }
            }
        }
    }

    /// Read the next run header. Returns false if there's no data left.
    fn next_run(&mut self) -> Result<bool> {
        if self.data.is_empty() {
            self.run = None;
            return Ok(false);
        }

        let (header, num_read) = read_uleb128(&self.data)?;
        self.data.advance(num_read);

        let bit_width = self.bit_width as usize;

        if header & 1 == 0 {
            let count = (header >> 1) as usize;
            let width = bit_width.div_ceil(8);
            if self.data.len() < width {
                return Err(StriderError::malformed("RLE run missing repeated value"));
            }

            let value = self.data[..width]
                .iter()
                .enumerate()
                .fold(0u32, |acc, (idx, b)| acc | ((*b as u32) << (8 * idx)));
            self.data.advance(width);

            self.run = Some(Run::Repeated {
                value,
                remaining: count,
            });
        } else {
            let groups = (header >> 1) as usize;
            let (Some(mut num_values), Some(num_bytes)) =
                (groups.checked_mul(8), groups.checked_mul(bit_width))
            else {
                return Err(StriderError::malformed(format!(
                    "Bit-packed run of {groups} groups is too large"
                )));
            };
            let num_bytes = num_bytes.min(self.data.len());

            // Nothing is stored for zero width values, they're all zero.
            if bit_width == 0 {
                self.run = Some(Run::Repeated {
                    value: 0,
                    remaining: num_values,
                });
                return Ok(true);
            }

            // Tolerate a truncated final run, only keeping complete values.
            num_values = num_values.min(num_bytes * 8 / bit_width);

            let packed = self.data.split_to(num_bytes);
            let mut values = Vec::with_capacity(num_values);
            let mut batch = u32::zero_packed_array();

            while values.len() < num_values {
                let offset = (values.len() * bit_width / 8).min(packed.len());
                u32::unpack_padded(&packed[offset..], bit_width, &mut batch);

                let n = (num_values - values.len()).min(u32::BATCH_SIZE);
                values.extend_from_slice(&batch[..n]);
            }

            self.run = Some(Run::Packed { values, pos: 0 });
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use strider_error::ErrorKind;

    use super::*;
    use crate::encoding::varint::put_uleb128;
    use crate::testutil::encode_rle_levels;

    #[test]
    fn repeated_run() {
        // Length 2, header 8 << 1 (8 repeated), value 1.
        let mut buf = Bytes::from_static(&[2, 0, 0, 0, 16, 1, 0xAA]);
        let mut out = [0; 8];

        let n = RleDecoder::default()
            .decode_levels(&mut buf, 1, &mut out)
            .unwrap();

        assert_eq!(8, n);
        assert_eq!([1; 8], out);
        // Trailing byte is left for whoever reads next.
        assert_eq!(&[0xAA][..], &buf[..]);
    }

    #[test]
    fn bit_packed_run() {
        // One group of 8 values at 2 bits: 0 1 2 3 3 2 1 0
        // => 0b11_10_01_00, 0b00_01_10_11
        let mut buf = Bytes::from_static(&[3, 0, 0, 0, 3, 0b1110_0100, 0b0001_1011]);
        let mut out = [0; 8];

        let n = RleDecoder::default()
            .decode_levels(&mut buf, 2, &mut out)
            .unwrap();

        assert_eq!(8, n);
        assert_eq!([0, 1, 2, 3, 3, 2, 1, 0], out);
        assert!(buf.is_empty());
    }

    #[test]
    fn mixed_runs_from_encoder() {
        let levels: Vec<u16> = (0..100).map(|v| (v % 3) as u16).collect();
        let mut buf = Bytes::from(encode_rle_levels(&levels, 2));

        let mut out = vec![0; levels.len()];
        let n = RleDecoder::default()
            .decode_levels(&mut buf, 2, &mut out)
            .unwrap();

        assert_eq!(levels.len(), n);
        assert_eq!(levels, out);
    }

    #[test]
    fn fewer_levels_than_requested() {
        // Only 4 repeated values encoded.
        let mut buf = Bytes::from_static(&[2, 0, 0, 0, 8, 1]);
        let mut out = [0; 6];

        let n = RleDecoder::default()
            .decode_levels(&mut buf, 1, &mut out)
            .unwrap();
        assert_eq!(4, n);
    }

    #[test]
    fn length_exceeds_data() {
        let mut buf = Bytes::from_static(&[10, 0, 0, 0, 8, 1]);
        let mut out = [0; 4];
        assert!(RleDecoder::default()
            .decode_levels(&mut buf, 1, &mut out)
            .is_err());
    }

    #[test]
    fn oversized_packed_run_header() {
        // Run header of u64::MAX, a bit-packed run with more groups than fit
        // in a usize once multiplied out.
        let mut data = vec![11, 0, 0, 0];
        data.extend([0xFF; 9]);
        data.extend([0x01, 0]);
        let mut buf = Bytes::from(data);

        let mut out = [0; 4];
        let err = RleDecoder::default()
            .decode_levels(&mut buf, 1, &mut out)
            .unwrap_err();
        assert_eq!(ErrorKind::Malformed, err.kind());
    }

    #[test]
    fn zero_width_packed_run_is_not_materialized() {
        // Packed run claiming 2^40 groups at bit width 0.
        let mut run = Vec::new();
        put_uleb128(&mut run, ((1u64 << 40) << 1) | 1);
        let mut data = (run.len() as u32).to_le_bytes().to_vec();
        data.extend(run);
        let mut buf = Bytes::from(data);

        let mut out = [7; 3];
        let n = RleDecoder::default()
            .decode_levels(&mut buf, 0, &mut out)
            .unwrap();
        assert_eq!(3, n);
        assert_eq!([0, 0, 0], out);
    }

    #[test]
    fn zero_bit_width() {
        // 5 repeated zero values, no value bytes.
        let mut buf = Bytes::from_static(&[1, 0, 0, 0, 10]);
        let mut out = [9; 5];
        let n = RleDecoder::default()
            .decode_levels(&mut buf, 0, &mut out)
            .unwrap();
        assert_eq!(5, n);
        assert_eq!([0; 5], out);
    }

    #[test]
    fn booleans() {
        // Length 3, bit packed group of 8: t t f t f f f t
        let mut decoder = RleDecoder::default();
        decoder
            .set_data(Bytes::from_static(&[2, 0, 0, 0, 3, 0b1000_1011]))
            .unwrap();

        let got: Vec<_> = (0..8).map(|_| decoder.decode_bool().unwrap()).collect();
        assert_eq!(
            vec![true, true, false, true, false, false, false, true],
            got
        );
        assert!(decoder.decode_bool().is_err());
    }
}
