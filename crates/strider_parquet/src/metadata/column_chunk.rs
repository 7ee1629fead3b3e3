//! Column chunk metadata

use super::column::ColumnPath;
use crate::compression::CompressionCodec;
use crate::encoding::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChunkMetadata {
    pub path_in_schema: ColumnPath,
    pub encodings: Vec<Encoding>,
    pub file_offset: i64,
    /// Total number of values (including nulls) across all pages.
    pub num_values: i64,
    pub compression: CompressionCodec,
    pub total_compressed_size: i64,
    pub total_uncompressed_size: i64,
    /// Byte offset of the first data page.
    pub data_page_offset: i64,
    pub dictionary_page_offset: Option<i64>,
}

impl ColumnChunkMetadata {
    /// Create metadata with only the fields required for reading set.
    pub fn new(
        path_in_schema: ColumnPath,
        data_page_offset: i64,
        num_values: i64,
        compression: CompressionCodec,
    ) -> Self {
        ColumnChunkMetadata {
            path_in_schema,
            encodings: Vec::new(),
            file_offset: data_page_offset,
            num_values,
            compression,
            total_compressed_size: 0,
            total_uncompressed_size: 0,
            data_page_offset,
            dictionary_page_offset: None,
        }
    }
}
