//! Consumers of decoded values.
//!
//! Readers never materialize values themselves. For every value slot they call
//! into a [`RowBuilder`], either marking the slot as absent, or handing over
//! the page's value decoder so the builder can decode the value into whatever
//! representation it wants.

use bytes::Bytes;
use strider_error::Result;

use crate::encoding::Decoder;
use crate::metadata::column::ColumnDescriptor;
use crate::types::Int96;

/// A single decoded primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Int96(Int96),
    Float(f32),
    Double(f64),
    ByteArray(Bytes),
    FixedLenByteArray(Bytes),
}

/// Receives one call per value slot read from a column.
///
/// Errors returned from either method are propagated to the caller of the
/// read as-is.
pub trait RowBuilder {
    /// The value, or one of its optional/repeated ancestors, is absent.
    fn primitive_nil(&mut self, column: &ColumnDescriptor) -> Result<()>;

    /// A value is present.
    ///
    /// Implementations must decode exactly one value from `decoder`.
    fn primitive(&mut self, column: &ColumnDescriptor, decoder: &mut dyn Decoder) -> Result<()>;
}

impl<B: RowBuilder + ?Sized> RowBuilder for &mut B {
    fn primitive_nil(&mut self, column: &ColumnDescriptor) -> Result<()> {
        (**self).primitive_nil(column)
    }

    fn primitive(&mut self, column: &ColumnDescriptor, decoder: &mut dyn Decoder) -> Result<()> {
        (**self).primitive(column, decoder)
    }
}

/// Builder collecting every slot into a vec, `None` for absent values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueCollector {
    values: Vec<Option<Value>>,
}

impl ValueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Option<Value>> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl RowBuilder for ValueCollector {
    fn primitive_nil(&mut self, _column: &ColumnDescriptor) -> Result<()> {
        self.values.push(None);
        Ok(())
    }

    fn primitive(&mut self, column: &ColumnDescriptor, decoder: &mut dyn Decoder) -> Result<()> {
        let value = decoder.decode_value(column.primitive_type())?;
        self.values.push(Some(value));
        Ok(())
    }
}
