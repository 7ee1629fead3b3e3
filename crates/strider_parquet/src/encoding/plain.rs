//! Plain encoding.
//!
//! Fixed width values are stored back to back in little endian, booleans are
//! bit packed (LSB first), and byte arrays are prefixed with a 4 byte little
//! endian length.

use bytes::{Buf, Bytes};
use strider_error::{Result, ResultExt, StriderError};

use super::{Decoder, Encoding};
use crate::types::{FixedWidth, Int96};

#[derive(Debug, Default)]
pub struct PlainDecoder {
    data: Bytes,
    /// Bit offset into the first byte of `data` when decoding booleans.
    bool_offset: u8,
}

impl PlainDecoder {
    fn take(&mut self, len: usize) -> Result<Bytes> {
        if self.data.len() < len {
            return Err(StriderError::malformed(format!(
                "Plain values ran out of data, need {len} bytes, have {}",
                self.data.len()
            )));
        }
        Ok(self.data.split_to(len))
    }

    fn decode_fixed<T: FixedWidth>(&mut self) -> Result<T> {
        let bytes = self.take(std::mem::size_of::<T::Bytes>())?;
        let bytes = T::Bytes::try_from(&bytes[..]).context("unexpected fixed width size")?;
        Ok(T::from_le_bytes(bytes))
    }
}

impl Decoder for PlainDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::Plain
    }

    fn set_data(&mut self, data: Bytes) -> Result<()> {
        self.data = data;
        self.bool_offset = 0;
        Ok(())
    }

    fn decode_bool(&mut self) -> Result<bool> {
        let byte = match self.data.first() {
            Some(byte) => *byte,
            None => return Err(StriderError::malformed("Plain booleans ran out of data")),
        };

        let val = (byte >> self.bool_offset) & 1 == 1;
        self.bool_offset += 1;
        if self.bool_offset == 8 {
            self.data.advance(1);
            self.bool_offset = 0;
        }

        Ok(val)
    }

    fn decode_i32(&mut self) -> Result<i32> {
        self.decode_fixed::<i32>()
    }

    fn decode_i64(&mut self) -> Result<i64> {
        self.decode_fixed::<i64>()
    }

    fn decode_int96(&mut self) -> Result<Int96> {
        self.decode_fixed::<Int96>()
    }

    fn decode_f32(&mut self) -> Result<f32> {
        self.decode_fixed::<f32>()
    }

    fn decode_f64(&mut self) -> Result<f64> {
        self.decode_fixed::<f64>()
    }

    fn decode_byte_array(&mut self) -> Result<Bytes> {
        let len = self.take(4)?.get_u32_le() as usize;
        self.take(len)
    }

    fn decode_fixed_len_byte_array(&mut self, len: usize) -> Result<Bytes> {
        self.take(len)
    }
}
