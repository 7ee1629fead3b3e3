//! Reading a single column across every row group in a file.
use strider_error::{Result, StriderError};
use tracing::trace;

use crate::builder::RowBuilder;
use crate::column_reader::RowGroupColumnReader;
use crate::levels::Levels;
use crate::row_group::RowGroupIterator;

/// Reads one column from all row groups, one after the other.
///
/// Every row group must contain the column. A row group missing it fails the
/// scan.
#[derive(Debug)]
pub struct ColumnScan {
    path: Vec<String>,
    row_groups: RowGroupIterator,
    /// Reader for the current row group.
    reader: Option<RowGroupColumnReader>,
}

impl ColumnScan {
    pub fn new(row_groups: RowGroupIterator, path: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ColumnScan {
            path: path.into_iter().map(Into::into).collect(),
            row_groups,
            reader: None,
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Get the levels of the next value without consuming it.
    ///
    /// Errors with exhausted after the last value of the last row group.
    pub fn peek(&mut self) -> Result<Levels> {
        loop {
            let reader = self.ensure_reader()?;
            match reader.peek() {
                Err(e) if e.is_exhausted() => self.reader = None,
                other => return other,
            }
        }
    }

    /// Read the next value into `builder`.
    pub fn read<B>(&mut self, builder: &mut B) -> Result<()>
    where
        B: RowBuilder + ?Sized,
    {
        loop {
            let reader = self.ensure_reader()?;
            match reader.read(&mut *builder) {
                Err(e) if e.is_exhausted() => self.reader = None,
                other => return other,
            }
        }
    }

    fn ensure_reader(&mut self) -> Result<&mut RowGroupColumnReader> {
        let reader = match self.reader.take() {
            Some(reader) => reader,
            None => {
                let row_group = match self.row_groups.next() {
                    Some(row_group) => row_group,
                    None => return Err(StriderError::exhausted()),
                };
                trace!(row_group = row_group.index(), path = ?self.path, "scanning row group");

                match row_group.column(&self.path)? {
                    Some(reader) => reader,
                    None => {
                        return Err(StriderError::new(format!(
                            "Column not found in row group {}: {}",
                            row_group.index(),
                            self.path.join(".")
                        )))
                    }
                }
            }
        };

        Ok(self.reader.insert(reader))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::builder::{Value, ValueCollector};
    use crate::compression::CompressionCodec;
    use crate::encoding::Encoding;
    use crate::io::MemorySource;
    use crate::metadata::file::FileMetadata;
    use crate::metadata::row_group::RowGroupMetadata;
    use crate::metadata::schema::Schema;
    use crate::testutil::{plain_i32, FileWriter, PageBuilder};
    use crate::types::{PhysicalType, PrimitiveType, Repetition};

    fn row_groups(with_b_in_second: bool) -> RowGroupIterator {
        let schema = Schema::new([
            PrimitiveType::new("a", Repetition::Optional, PhysicalType::Int32).into(),
            PrimitiveType::new("b", Repetition::Required, PhysicalType::Int32).into(),
        ]);

        let mut writer = FileWriter::new();
        let rg0 = RowGroupMetadata::new(
            vec![
                writer.chunk(
                    &["a"],
                    &[PageBuilder::new(2)
                        .def_levels(&[1, 0], 1)
                        .values(Encoding::Plain, plain_i32(&[1]))],
                    CompressionCodec::Snappy,
                ),
                writer.chunk(
                    &["b"],
                    &[PageBuilder::new(2).values(Encoding::Plain, plain_i32(&[5, 6]))],
                    CompressionCodec::Snappy,
                ),
            ],
            2,
        );

        let mut columns = vec![writer.chunk(
            &["a"],
            &[
                PageBuilder::new(1)
                    .def_levels(&[1], 1)
                    .values(Encoding::Plain, plain_i32(&[2])),
                PageBuilder::new(1)
                    .def_levels(&[1], 1)
                    .values(Encoding::Plain, plain_i32(&[3])),
            ],
            CompressionCodec::Snappy,
        )];
        if with_b_in_second {
            columns.push(writer.chunk(
                &["b"],
                &[PageBuilder::new(2).values(Encoding::Plain, plain_i32(&[7, 8]))],
                CompressionCodec::Snappy,
            ));
        }
        let rg1 = RowGroupMetadata::new(columns, 2);

        let metadata = FileMetadata::new(schema, vec![rg0, rg1]);
        RowGroupIterator::new(
            Arc::new(metadata),
            Arc::new(MemorySource::new(writer.into_bytes())),
        )
    }

    fn scan_all(scan: &mut ColumnScan) -> Result<Vec<Option<Value>>> {
        let mut builder = ValueCollector::new();
        loop {
            match scan.read(&mut builder) {
                Ok(()) => (),
                Err(e) if e.is_exhausted() => return Ok(builder.into_values()),
                Err(e) => return Err(e),
            }
        }
    }

    #[test]
    fn scan_across_row_groups() {
        let mut scan = ColumnScan::new(row_groups(true), ["a"]);
        let values = scan_all(&mut scan).unwrap();

        assert_eq!(
            vec![
                Some(Value::Int32(1)),
                None,
                Some(Value::Int32(2)),
                Some(Value::Int32(3)),
            ],
            values
        );

        // Stays exhausted.
        assert!(scan.peek().unwrap_err().is_exhausted());
    }

    #[test]
    fn peek_moves_to_next_row_group() {
        let mut scan = ColumnScan::new(row_groups(true), ["b"]);
        let mut builder = ValueCollector::new();

        scan.read(&mut builder).unwrap();
        scan.read(&mut builder).unwrap();
        assert_eq!(Levels::new(0, 0), scan.peek().unwrap());
        scan.read(&mut builder).unwrap();

        assert_eq!(3, builder.len());
    }

    #[test]
    fn missing_in_row_group() {
        let mut scan = ColumnScan::new(row_groups(false), ["b"]);
        let err = scan_all(&mut scan).unwrap_err();

        assert!(!err.is_exhausted());
        assert!(err.to_string().contains("row group 1"), "{err}");
    }

    #[test]
    fn no_row_groups() {
        let metadata = FileMetadata::new(Schema::new([]), Vec::new());
        let iter = RowGroupIterator::new(
            Arc::new(metadata),
            Arc::new(MemorySource::new(Vec::<u8>::new())),
        );
        let mut scan = ColumnScan::new(iter, ["a"]);
        assert!(scan.peek().unwrap_err().is_exhausted());
    }
}
