pub mod decode;

use bytes::Bytes;
use strider_error::{Result, StriderError};

use super::{Decoder, Encoding};

/// DELTA_BINARY_PACKED decoder for int32 and int64 columns.
///
/// The whole values section is decoded on first access since deltas are only
/// meaningful relative to the previous value.
#[derive(Debug, Default)]
pub struct DeltaBinaryPackedDecoder {
    data: Option<Bytes>,
    values: Vec<i64>,
    pos: usize,
}

impl DeltaBinaryPackedDecoder {
    fn next_value(&mut self) -> Result<i64> {
        if let Some(data) = self.data.take() {
            let mut decoder = decode::Decoder::try_new(&data)?;
            self.values.clear();
            decoder.decode_values(&mut self.values)?;
            self.pos = 0;
        }

        match self.values.get(self.pos) {
            Some(v) => {
                self.pos += 1;
                Ok(*v)
            }
            None => Err(StriderError::malformed("Delta values ran out of data")),
        }
    }
}

impl Decoder for DeltaBinaryPackedDecoder {
    fn encoding(&self) -> Encoding {
        Encoding::DeltaBinaryPacked
    }

    fn set_data(&mut self, data: Bytes) -> Result<()> {
        self.data = Some(data);
        self.values.clear();
        self.pos = 0;
        Ok(())
    }

    fn decode_i32(&mut self) -> Result<i32> {
        Ok(self.next_value()? as i32)
    }

    fn decode_i64(&mut self) -> Result<i64> {
        self.next_value()
    }
}
