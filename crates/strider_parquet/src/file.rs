use std::sync::Arc;

use crate::io::ChunkSource;
use crate::metadata::file::FileMetadata;
use crate::row_group::RowGroupIterator;
use crate::scan::ColumnScan;

/// A parquet file with already decoded metadata.
#[derive(Debug, Clone)]
pub struct ParquetFile {
    metadata: Arc<FileMetadata>,
    source: Arc<dyn ChunkSource>,
}

impl ParquetFile {
    pub fn new(metadata: FileMetadata, source: impl ChunkSource + 'static) -> Self {
        ParquetFile {
            metadata: Arc::new(metadata),
            source: Arc::new(source),
        }
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    /// Iterate over every row group in the file.
    pub fn row_groups(&self) -> RowGroupIterator {
        RowGroupIterator::new(self.metadata.clone(), self.source.clone())
    }

    /// Scan the leaf column at `path` across all row groups.
    pub fn column_scan<S: AsRef<str>>(&self, path: &[S]) -> ColumnScan {
        ColumnScan::new(self.row_groups(), path.iter().map(|s| s.as_ref().to_string()))
    }
}
