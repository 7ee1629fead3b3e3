//! Row groups and iterating over them.
use std::sync::Arc;

use strider_error::Result;

use crate::column_reader::RowGroupColumnReader;
use crate::io::ChunkSource;
use crate::metadata::file::FileMetadata;
use crate::metadata::row_group::RowGroupMetadata;

/// Iterates over the row groups of a file in metadata order.
///
/// The last row group returned from `next` is also available through
/// `value`, which returns `None` before the first call to `next` and after
/// the iterator is exhausted.
#[derive(Debug)]
pub struct RowGroupIterator {
    metadata: Arc<FileMetadata>,
    source: Arc<dyn ChunkSource>,
    /// Index of the next row group to produce.
    index: usize,
    current: Option<RowGroup>,
}

impl RowGroupIterator {
    pub fn new(metadata: Arc<FileMetadata>, source: Arc<dyn ChunkSource>) -> Self {
        RowGroupIterator {
            metadata,
            source,
            index: 0,
            current: None,
        }
    }

    /// The row group produced by the most recent call to `next`.
    pub fn value(&self) -> Option<&RowGroup> {
        self.current.as_ref()
    }
}

impl Iterator for RowGroupIterator {
    type Item = RowGroup;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.metadata.row_groups.len() {
            self.current = None;
            return None;
        }

        let row_group = RowGroup {
            metadata: self.metadata.clone(),
            source: self.source.clone(),
            index: self.index,
        };
        self.index += 1;
        self.current = Some(row_group.clone());

        Some(row_group)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.metadata.row_groups.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

/// A single row group in a file.
#[derive(Debug, Clone)]
pub struct RowGroup {
    metadata: Arc<FileMetadata>,
    source: Arc<dyn ChunkSource>,
    index: usize,
}

impl RowGroup {
    /// Position of this row group in the file.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn metadata(&self) -> &RowGroupMetadata {
        &self.metadata.row_groups[self.index]
    }

    pub fn num_rows(&self) -> i64 {
        self.metadata().num_rows
    }

    /// Get a reader for the leaf column at exactly `path`.
    ///
    /// Returns `None` if the schema has no leaf at that path, or this row
    /// group has no column chunk for it. Nothing is read from the source, the
    /// only possible error is failing to fork it.
    pub fn column<S: AsRef<str>>(&self, path: &[S]) -> Result<Option<RowGroupColumnReader>> {
        let column = match self.metadata.schema.column(path) {
            Some(column) => column,
            None => return Ok(None),
        };

        let chunk = match self.metadata().column_by_path(path) {
            Some(chunk) => chunk.clone(),
            None => return Ok(None),
        };

        let source = self.source.fork()?;

        Ok(Some(RowGroupColumnReader::new(source, column, chunk)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Seek, SeekFrom};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::builder::{Value, ValueCollector};
    use crate::compression::CompressionCodec;
    use crate::encoding::Encoding;
    use crate::io::MemorySource;
    use crate::metadata::schema::Schema;
    use crate::testutil::{plain_byte_arrays, plain_i32, FileWriter, PageBuilder};
    use crate::types::{GroupType, PhysicalType, PrimitiveType, Repetition};

    /// Source that counts forks and reads through any fork.
    #[derive(Debug)]
    struct TrackingSource {
        inner: Cursor<Vec<u8>>,
        forks: Arc<AtomicUsize>,
        reads: Arc<AtomicUsize>,
    }

    impl Read for TrackingSource {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(buf)
        }
    }

    impl Seek for TrackingSource {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    impl ChunkSource for TrackingSource {
        fn fork(&self) -> Result<Box<dyn ChunkSource>> {
            self.forks.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(TrackingSource {
                inner: Cursor::new(self.inner.get_ref().clone()),
                forks: self.forks.clone(),
                reads: self.reads.clone(),
            }))
        }
    }

    /// Schema:
    ///
    /// ```text
    /// message doc {
    ///   required int32 id;
    ///   optional group a {
    ///     optional group b {
    ///       required int32 c;
    ///     }
    ///   }
    ///   optional binary name;
    /// }
    /// ```
    fn schema() -> Schema {
        Schema::new([
            PrimitiveType::new("id", Repetition::Required, PhysicalType::Int32).into(),
            GroupType::new(
                "a",
                Repetition::Optional,
                [GroupType::new(
                    "b",
                    Repetition::Optional,
                    [PrimitiveType::new("c", Repetition::Required, PhysicalType::Int32).into()],
                )
                .into()],
            )
            .into(),
            PrimitiveType::new("name", Repetition::Optional, PhysicalType::ByteArray).into(),
        ])
    }

    fn file_metadata(writer: &mut FileWriter) -> FileMetadata {
        let rg0 = RowGroupMetadata::new(
            vec![
                writer.chunk(
                    &["id"],
                    &[PageBuilder::new(2).values(Encoding::Plain, plain_i32(&[1, 2]))],
                    CompressionCodec::Snappy,
                ),
                writer.chunk(
                    &["a", "b", "c"],
                    &[PageBuilder::new(2)
                        .def_levels(&[2, 0], 2)
                        .values(Encoding::Plain, plain_i32(&[7]))],
                    CompressionCodec::Snappy,
                ),
                writer.chunk(
                    &["name"],
                    &[PageBuilder::new(2)
                        .def_levels(&[1, 1], 1)
                        .values(Encoding::Plain, plain_byte_arrays(&["x", "yz"]))],
                    CompressionCodec::Snappy,
                ),
            ],
            2,
        );
        // Second row group is missing the "name" column.
        let rg1 = RowGroupMetadata::new(
            vec![writer.chunk(
                &["id"],
                &[PageBuilder::new(1).values(Encoding::Plain, plain_i32(&[3]))],
                CompressionCodec::Snappy,
            )],
            1,
        );

        FileMetadata::new(schema(), vec![rg0, rg1])
    }

    struct Fixture {
        iter: RowGroupIterator,
        forks: Arc<AtomicUsize>,
        reads: Arc<AtomicUsize>,
    }

    fn fixture() -> Fixture {
        let mut writer = FileWriter::new();
        let metadata = file_metadata(&mut writer);

        let forks = Arc::new(AtomicUsize::new(0));
        let reads = Arc::new(AtomicUsize::new(0));
        let source = TrackingSource {
            inner: Cursor::new(writer.into_bytes()),
            forks: forks.clone(),
            reads: reads.clone(),
        };

        Fixture {
            iter: RowGroupIterator::new(Arc::new(metadata), Arc::new(source)),
            forks,
            reads,
        }
    }

    #[test]
    fn iterate_in_order() {
        let mut iter = fixture().iter;
        assert!(iter.value().is_none());
        assert_eq!(2, iter.size_hint().0);

        let rg = iter.next().unwrap();
        assert_eq!(0, rg.index());
        assert_eq!(2, rg.num_rows());
        assert_eq!(0, iter.value().unwrap().index());

        let rg = iter.next().unwrap();
        assert_eq!(1, rg.index());
        assert_eq!(1, rg.num_rows());

        assert!(iter.next().is_none());
        assert!(iter.value().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn exact_path_lookup() {
        let mut iter = fixture().iter;
        let rg = iter.next().unwrap();

        // Groups and prefixes aren't columns.
        assert!(rg.column(&["a"]).unwrap().is_none());
        assert!(rg.column(&["a", "b"]).unwrap().is_none());
        assert!(rg.column(&["a", "b", "c", "d"]).unwrap().is_none());

        let reader = rg.column(&["a", "b", "c"]).unwrap().unwrap();
        assert_eq!(2, reader.descriptor().max_def_level());
        assert_eq!(0, reader.descriptor().max_rep_level());
    }

    #[test]
    fn missing_column_doesnt_touch_source() {
        let Fixture {
            mut iter,
            forks,
            reads,
        } = fixture();

        iter.next().unwrap();
        let rg = iter.next().unwrap();

        // In the schema, but not in this row group.
        assert!(rg.column(&["name"]).unwrap().is_none());
        // Not in the schema at all.
        assert!(rg.column(&["nope"]).unwrap().is_none());

        assert_eq!(0, forks.load(Ordering::SeqCst));
        assert_eq!(0, reads.load(Ordering::SeqCst));
    }

    #[test]
    fn column_reader_is_lazy() {
        let Fixture {
            mut iter,
            forks,
            reads,
        } = fixture();

        let rg = iter.next().unwrap();
        let mut reader = rg.column(&["name"]).unwrap().unwrap();
        assert_eq!(1, forks.load(Ordering::SeqCst));
        assert_eq!(0, reads.load(Ordering::SeqCst));

        let mut builder = ValueCollector::new();
        reader.read(&mut builder).unwrap();
        reader.read(&mut builder).unwrap();
        assert!(reader.read(&mut builder).unwrap_err().is_exhausted());

        assert_eq!(
            vec![
                Some(Value::ByteArray("x".into())),
                Some(Value::ByteArray("yz".into())),
            ],
            builder.into_values()
        );
    }

    #[test]
    fn nested_optional_column() {
        let mut iter = fixture().iter;
        let rg = iter.next().unwrap();

        let mut reader = rg.column(&["a", "b", "c"]).unwrap().unwrap();
        let mut builder = ValueCollector::new();
        reader.read(&mut builder).unwrap();
        reader.read(&mut builder).unwrap();

        assert_eq!(vec![Some(Value::Int32(7)), None], builder.into_values());
    }

    #[test]
    fn columns_read_independently() {
        let metadata = {
            let mut writer = FileWriter::new();
            let metadata = file_metadata(&mut writer);
            (metadata, writer.into_bytes())
        };
        let source = MemorySource::new(metadata.1);
        let mut iter = RowGroupIterator::new(Arc::new(metadata.0), Arc::new(source));
        let rg = iter.next().unwrap();

        let mut ids = rg.column(&["id"]).unwrap().unwrap();
        let mut names = rg.column(&["name"]).unwrap().unwrap();

        // Interleave reads, each reader has its own cursor.
        let mut id_values = ValueCollector::new();
        let mut name_values = ValueCollector::new();
        ids.read(&mut id_values).unwrap();
        names.read(&mut name_values).unwrap();
        ids.read(&mut id_values).unwrap();
        names.read(&mut name_values).unwrap();

        assert_eq!(
            vec![Some(Value::Int32(1)), Some(Value::Int32(2))],
            id_values.into_values()
        );
        assert_eq!(2, name_values.len());
    }
}
