//! Lazy, streaming reader for parquet column data.
//!
//! Reading starts from a [`ParquetFile`] (already decoded metadata plus a byte
//! source), walks the row groups with a [`RowGroupIterator`], and reads one
//! column of a row group at a time with a [`RowGroupColumnReader`]. Values are
//! handed to a [`RowBuilder`] one slot at a time, and only a single page per
//! column is ever held in memory.
//!
//! Running out of values is signaled with an error for which
//! `is_exhausted()` returns true.

pub mod builder;
pub mod column_reader;
pub mod compression;
pub mod encoding;
pub mod file;
pub mod io;
pub mod levels;
pub mod metadata;
pub mod page;
pub mod row_group;
pub mod scan;
pub mod thrift_gen;
pub mod types;

pub(crate) mod thrift_ext;

#[cfg(test)]
pub(crate) mod testutil;

pub use builder::{RowBuilder, Value, ValueCollector};
pub use column_reader::RowGroupColumnReader;
pub use file::ParquetFile;
pub use io::{ChunkSource, FileSource, MemorySource};
pub use levels::Levels;
pub use row_group::{RowGroup, RowGroupIterator};
pub use scan::ColumnScan;
