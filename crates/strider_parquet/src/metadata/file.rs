//! File metadata.

use super::row_group::RowGroupMetadata;
use super::schema::Schema;

/// File metadata for a parquet file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    pub version: i32,
    pub schema: Schema,
    pub num_rows: i64,
    pub row_groups: Vec<RowGroupMetadata>,
    pub created_by: Option<String>,
}

impl FileMetadata {
    pub fn new(schema: Schema, row_groups: Vec<RowGroupMetadata>) -> Self {
        let num_rows = row_groups.iter().map(|rg| rg.num_rows).sum();
        FileMetadata {
            version: 1,
            schema,
            num_rows,
            row_groups,
            created_by: None,
        }
    }
}
