pub mod bit_packed;
pub mod bitpack;
pub mod delta_binary;
pub mod plain;
pub mod rle;
pub mod varint;

use std::fmt::Debug;

use bytes::Bytes;
use strider_error::{not_implemented, Result, StriderError};

use crate::builder::Value;
use crate::types::{Int96, PhysicalType, PrimitiveType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Plain,
    PlainDictionary,
    Rle,
    BitPacked,
    DeltaBinaryPacked,
    DeltaLengthByteArray,
    DeltaByteArray,
    RleDictionary,
    ByteStreamSplit,
}

impl Encoding {
    /// Convert from the encoding id used in the thrift definitions.
    pub fn try_from_thrift(id: i32) -> Result<Self> {
        Ok(match id {
            0 => Self::Plain,
            2 => Self::PlainDictionary,
            3 => Self::Rle,
            4 => Self::BitPacked,
            5 => Self::DeltaBinaryPacked,
            6 => Self::DeltaLengthByteArray,
            7 => Self::DeltaByteArray,
            8 => Self::RleDictionary,
            9 => Self::ByteStreamSplit,
            other => {
                return Err(StriderError::malformed(format!(
                    "Unknown encoding id: {other}"
                )))
            }
        })
    }
}

/// Decodes values or levels from a page buffer.
///
/// Level streams are read directly off the front of the page buffer with
/// `decode_levels`. Values are read one at a time after binding the decoder to
/// the rest of the buffer with `set_data`.
///
/// Encodings only implement the operations that make sense for them,
/// everything else returns an `Unsupported` error.
pub trait Decoder: Debug + Send {
    fn encoding(&self) -> Encoding;

    /// Bind the decoder to the values section of a page.
    fn set_data(&mut self, data: Bytes) -> Result<()>;

    /// Decode `out.len()` levels of `bit_width` bits from the front of `buf`.
    ///
    /// `buf` is advanced past the encoded levels. Returns the number of levels
    /// decoded, which is less than `out.len()` if `buf` ran out.
    fn decode_levels(&mut self, _buf: &mut Bytes, _bit_width: u8, _out: &mut [u16]) -> Result<usize> {
        not_implemented!("{:?} encoded levels", self.encoding())
    }

    fn decode_bool(&mut self) -> Result<bool> {
        not_implemented!("{:?} encoded booleans", self.encoding())
    }

    fn decode_i32(&mut self) -> Result<i32> {
        not_implemented!("{:?} encoded int32", self.encoding())
    }

    fn decode_i64(&mut self) -> Result<i64> {
        not_implemented!("{:?} encoded int64", self.encoding())
    }

    fn decode_int96(&mut self) -> Result<Int96> {
        not_implemented!("{:?} encoded int96", self.encoding())
    }

    fn decode_f32(&mut self) -> Result<f32> {
        not_implemented!("{:?} encoded float", self.encoding())
    }

    fn decode_f64(&mut self) -> Result<f64> {
        not_implemented!("{:?} encoded double", self.encoding())
    }

    fn decode_byte_array(&mut self) -> Result<Bytes> {
        not_implemented!("{:?} encoded byte arrays", self.encoding())
    }

    fn decode_fixed_len_byte_array(&mut self, _len: usize) -> Result<Bytes> {
        not_implemented!("{:?} encoded fixed length byte arrays", self.encoding())
    }

    /// Decode a single value according to the column's physical type.
    fn decode_value(&mut self, ty: &PrimitiveType) -> Result<Value> {
        Ok(match ty.physical_type {
            PhysicalType::Boolean => Value::Boolean(self.decode_bool()?),
            PhysicalType::Int32 => Value::Int32(self.decode_i32()?),
            PhysicalType::Int64 => Value::Int64(self.decode_i64()?),
            PhysicalType::Int96 => Value::Int96(self.decode_int96()?),
            PhysicalType::Float => Value::Float(self.decode_f32()?),
            PhysicalType::Double => Value::Double(self.decode_f64()?),
            PhysicalType::ByteArray => Value::ByteArray(self.decode_byte_array()?),
            PhysicalType::FixedLenByteArray(len) => {
                Value::FixedLenByteArray(self.decode_fixed_len_byte_array(len)?)
            }
        })
    }
}

/// Get a fresh decoder for `encoding`.
pub fn get_decoder(encoding: Encoding) -> Result<Box<dyn Decoder>> {
    match encoding {
        Encoding::Plain => Ok(Box::new(plain::PlainDecoder::default())),
        Encoding::Rle => Ok(Box::new(rle::RleDecoder::default())),
        Encoding::BitPacked => Ok(Box::new(bit_packed::BitPackedDecoder)),
        Encoding::DeltaBinaryPacked => Ok(Box::new(
            delta_binary::DeltaBinaryPackedDecoder::default(),
        )),
        other => Err(StriderError::unsupported(format!(
            "Unsupported encoding: {other:?}"
        ))),
    }
}

/// Minimum number of bits needed to represent `max_level`.
pub fn level_bit_width(max_level: u16) -> u8 {
    (u16::BITS - max_level.leading_zeros()) as u8
}
