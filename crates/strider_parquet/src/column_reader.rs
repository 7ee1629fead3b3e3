//! Reading a single column within a row group.
use std::io::{Seek, SeekFrom};
use std::sync::Arc;

use strider_error::{Result, StriderError};
use tracing::{debug, trace};

use crate::builder::RowBuilder;
use crate::compression::get_codec;
use crate::io::ChunkSource;
use crate::levels::Levels;
use crate::metadata::column::ColumnDescriptor;
use crate::metadata::column_chunk::ColumnChunkMetadata;
use crate::page::PageReader;

/// Reads every value of one column in a row group, page by page.
///
/// Creating the reader doesn't do any I/O. The source is only seeked to the
/// start of the column chunk on the first call to `peek` or `read`.
#[derive(Debug)]
pub struct RowGroupColumnReader {
    /// Our own fork of the file source.
    source: Box<dyn ChunkSource>,
    column: Arc<ColumnDescriptor>,
    metadata: ColumnChunkMetadata,

    /// If we've seeked to the first page.
    ready: bool,
    rows_read: i64,
    total_rows: i64,

    /// Page currently being read, if any.
    page: Option<PageReader>,
}

impl RowGroupColumnReader {
    pub fn new(
        source: Box<dyn ChunkSource>,
        column: ColumnDescriptor,
        metadata: ColumnChunkMetadata,
    ) -> Self {
        RowGroupColumnReader {
            source,
            column: Arc::new(column),
            metadata,
            ready: false,
            rows_read: 0,
            total_rows: 0,
            page: None,
        }
    }

    /// The leaf column being read.
    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.column
    }

    pub fn metadata(&self) -> &ColumnChunkMetadata {
        &self.metadata
    }

    /// Number of values read so far.
    pub fn rows_read(&self) -> i64 {
        self.rows_read
    }

    /// Get the levels for the next value without consuming it.
    ///
    /// Returns an exhausted error once every value in the column has been
    /// read.
    pub fn peek(&mut self) -> Result<Levels> {
        loop {
            let (page, source) = self.ensure_page_available()?;

            let opening = !page.is_ready();
            let offset = if opening { source.stream_position()? } else { 0 };

            match page.peek(source) {
                Ok(levels) => return Ok(levels),
                Err(e) if e.is_exhausted() => {
                    // Only possible for a page without any values, try the
                    // next one.
                    trace!(column = %self.column.path(), offset, "skipping empty page");
                    self.page = None;
                }
                Err(e) if opening => return Err(self.page_error(e, offset)),
                Err(e) => return Err(e),
            }
        }
    }

    /// Read the next value into `builder`.
    ///
    /// Errors from the builder are returned as-is, and the value doesn't
    /// count as read.
    pub fn read<B>(&mut self, builder: &mut B) -> Result<()>
    where
        B: RowBuilder + ?Sized,
    {
        // Opens the next non-empty page if needed.
        self.peek()?;

        let (page, source) = self.ensure_page_available()?;
        page.read(source, builder)?;
        self.rows_read += 1;

        Ok(())
    }

    /// Seek to the first page of the column chunk if we haven't already.
    fn ensure_ready(&mut self) -> Result<()> {
        if self.ready {
            return Ok(());
        }

        let offset = self.metadata.data_page_offset;
        debug!(
            column = %self.column.path(),
            offset,
            num_values = self.metadata.num_values,
            "opening column chunk"
        );

        let offset = u64::try_from(offset).map_err(|_| {
            StriderError::malformed(format!("Negative data page offset: {offset}"))
        })?;
        self.source.seek(SeekFrom::Start(offset))?;

        self.rows_read = 0;
        self.total_rows = self.metadata.num_values;
        self.ready = true;

        Ok(())
    }

    /// Make sure there's a page to read from, creating a new one if the
    /// current one is done.
    ///
    /// Errors with exhausted once all rows in the column have been read.
    fn ensure_page_available(&mut self) -> Result<(&mut PageReader, &mut Box<dyn ChunkSource>)> {
        self.ensure_ready()?;

        if self.rows_read >= self.total_rows {
            return Err(StriderError::exhausted());
        }

        if self.page.as_ref().is_some_and(|page| page.is_done()) {
            self.page = None;
        }

        let page = match self.page.take() {
            Some(page) => page,
            None => {
                // Codec resolved before the page is created so that an
                // unsupported codec fails without reading anything.
                let codec = get_codec(self.metadata.compression)?;
                PageReader::new(self.column.clone(), codec)
            }
        };

        Ok((self.page.insert(page), &mut self.source))
    }

    fn page_error(&self, err: StriderError, offset: u64) -> StriderError {
        StriderError::with_source(
            format!(
                "Failed to open page at offset {offset} for column {}",
                self.column.path()
            ),
            Box::new(err),
        )
    }
}
