//! Row group metadata.

use super::column_chunk::ColumnChunkMetadata;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowGroupMetadata {
    pub columns: Vec<ColumnChunkMetadata>,
    pub num_rows: i64,
    pub total_byte_size: i64,
    /// Offset from beginning of file.
    pub file_offset: Option<i64>,
    /// Row group ordinal in the file.
    pub ordinal: Option<i16>,
}

impl RowGroupMetadata {
    pub fn new(columns: Vec<ColumnChunkMetadata>, num_rows: i64) -> Self {
        RowGroupMetadata {
            columns,
            num_rows,
            total_byte_size: 0,
            file_offset: None,
            ordinal: None,
        }
    }

    /// Find the metadata for the column at exactly `path`.
    // TODO: Linear scan, index by path if wide schemas show up in profiles.
    pub fn column_by_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&ColumnChunkMetadata> {
        self.columns
            .iter()
            .find(|col| col.path_in_schema.matches(path))
    }
}
