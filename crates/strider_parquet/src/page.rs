//! Page headers and reading values out of a single page.
use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use bytes::Bytes;
use strider_error::{Result, StriderError};
use tracing::{debug, trace};

use crate::builder::RowBuilder;
use crate::compression::Codec;
use crate::encoding::{get_decoder, level_bit_width, Decoder, Encoding};
use crate::levels::Levels;
use crate::metadata::column::ColumnDescriptor;
use crate::thrift_ext::read_compact;
use crate::thrift_gen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    DataPage,
    IndexPage,
    DictionaryPage,
    DataPageV2,
}

impl PageType {
    pub fn try_from_thrift(id: i32) -> Result<Self> {
        Ok(match id {
            0 => Self::DataPage,
            1 => Self::IndexPage,
            2 => Self::DictionaryPage,
            3 => Self::DataPageV2,
            other => {
                return Err(StriderError::malformed(format!(
                    "Unknown page type: {other}"
                )))
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPageHeader {
    pub num_values: usize,
    pub encoding: Encoding,
    pub definition_level_encoding: Encoding,
    pub repetition_level_encoding: Encoding,
}

impl DataPageHeader {
    pub fn try_from_thrift(header: &thrift_gen::DataPageHeader) -> Result<Self> {
        Ok(DataPageHeader {
            num_values: non_negative(header.num_values, "num_values")?,
            encoding: Encoding::try_from_thrift(header.encoding)?,
            definition_level_encoding: Encoding::try_from_thrift(
                header.definition_level_encoding,
            )?,
            repetition_level_encoding: Encoding::try_from_thrift(
                header.repetition_level_encoding,
            )?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub page_type: PageType,
    pub uncompressed_page_size: usize,
    pub compressed_page_size: usize,
    /// Only set for data pages.
    pub data_page_header: Option<DataPageHeader>,
}

impl PageHeader {
    pub fn try_from_thrift(header: &thrift_gen::PageHeader) -> Result<Self> {
        let page_type = PageType::try_from_thrift(header.type_)?;

        let data_page_header = match (&page_type, &header.data_page_header) {
            (PageType::DataPage, Some(h)) => Some(DataPageHeader::try_from_thrift(h)?),
            (PageType::DataPage, None) => {
                return Err(StriderError::malformed(
                    "Data page is missing its data page header",
                ))
            }
            _ => None,
        };

        Ok(PageHeader {
            page_type,
            uncompressed_page_size: non_negative(
                header.uncompressed_page_size,
                "uncompressed_page_size",
            )?,
            compressed_page_size: non_negative(
                header.compressed_page_size,
                "compressed_page_size",
            )?,
            data_page_header,
        })
    }

    /// Read a page header from the current position of `reader`.
    ///
    /// The reader is left positioned at the start of the page data.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let header: thrift_gen::PageHeader = read_compact(reader)?;
        Self::try_from_thrift(&header)
    }
}

fn non_negative(v: i32, field: &str) -> Result<usize> {
    usize::try_from(v)
        .map_err(|_| StriderError::malformed(format!("Negative page header {field}: {v}")))
}

/// Lazily reads values from a single data page.
///
/// Nothing is read from the source until the first call to `peek` or `read`.
/// At that point the header is parsed, the page data decompressed, and the
/// levels decoded. Values are then handed out one slot at a time until the
/// page is done.
///
/// A done page is never reused. The column reader drops it and creates a new
/// one for the next page.
pub struct PageReader {
    column: Arc<ColumnDescriptor>,
    codec: Box<dyn Codec>,
    /// Set once the page has been opened.
    state: Option<PageState>,
}

struct PageState {
    num_values: usize,
    values_read: usize,
    /// Bound to the values section of the decompressed page.
    value_decoder: Box<dyn Decoder>,
    /// None if the column isn't repeated.
    repetition_levels: Option<Vec<u16>>,
    /// None if the column is required.
    definition_levels: Option<Vec<u16>>,
}

impl PageReader {
    pub fn new(column: Arc<ColumnDescriptor>, codec: Box<dyn Codec>) -> Self {
        PageReader {
            column,
            codec,
            state: None,
        }
    }

    /// If the header has been read and the page data decoded.
    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    /// If every value in the page has been read.
    ///
    /// A page that hasn't been opened yet is never done.
    pub fn is_done(&self) -> bool {
        match &self.state {
            Some(state) => state.values_read >= state.num_values,
            None => false,
        }
    }

    /// Returns the levels of the next value without consuming it.
    ///
    /// Errors with an exhausted error once all values have been read.
    pub fn peek(&mut self, source: &mut dyn Read) -> Result<Levels> {
        let state = self.ensure_ready(source)?;
        state.peek()
    }

    /// Read the next value slot into `builder`.
    ///
    /// The slot counts as consumed even if the builder errors.
    pub fn read<B>(&mut self, source: &mut dyn Read, builder: &mut B) -> Result<()>
    where
        B: RowBuilder + ?Sized,
    {
        // Clone to avoid borrowing self while the state is borrowed mutably.
        let column = self.column.clone();
        let state = self.ensure_ready(source)?;

        let levels = state.peek()?;
        let result = if levels.definition < column.max_def_level() {
            builder.primitive_nil(&column)
        } else {
            builder.primitive(&column, state.value_decoder.as_mut())
        };
        state.values_read += 1;

        if state.values_read == state.num_values {
            trace!(values = state.num_values, "page done");
        }

        result
    }

    fn ensure_ready(&mut self, source: &mut dyn Read) -> Result<&mut PageState> {
        let state = match self.state.take() {
            Some(state) => state,
            None => self.open(source)?,
        };
        Ok(self.state.insert(state))
    }

    fn open(&mut self, source: &mut dyn Read) -> Result<PageState> {
        let header = PageHeader::read_from(&mut *source)?;
        let data_header = match (header.page_type, &header.data_page_header) {
            (PageType::DataPage, Some(data_header)) => data_header,
            (other, _) => {
                return Err(StriderError::unsupported(format!(
                    "Unsupported page type: {other:?}"
                )))
            }
        };

        debug!(
            num_values = data_header.num_values,
            compressed_size = header.compressed_page_size,
            uncompressed_size = header.uncompressed_page_size,
            encoding = ?data_header.encoding,
            "opening page"
        );

        let mut value_decoder = get_decoder(data_header.encoding)?;
        let mut repetition_decoder = get_decoder(data_header.repetition_level_encoding)?;
        let mut definition_decoder = get_decoder(data_header.definition_level_encoding)?;

        // TODO: Reuse compressed/decompressed buffers across pages.
        let mut compressed = vec![0; header.compressed_page_size];
        read_full(source, &mut compressed)?;

        let mut decompressed = vec![0; header.uncompressed_page_size];
        self.codec.decompress(&compressed, &mut decompressed)?;

        // Levels and values are sequential in the page. Each level decoder
        // advances this past what it read.
        let mut buf = Bytes::from(decompressed);
        let num_values = data_header.num_values;

        // Non-nested columns never have repetition levels.
        let repetition_levels =
            if self.column.path().depth() > 1 && self.column.max_rep_level() > 0 {
                Some(decode_levels(
                    repetition_decoder.as_mut(),
                    &mut buf,
                    self.column.max_rep_level(),
                    num_values,
                    "repetition",
                )?)
            } else {
                None
            };

        // Required columns never have definition levels.
        let definition_levels = if self.column.max_def_level() >= 1 {
            Some(decode_levels(
                definition_decoder.as_mut(),
                &mut buf,
                self.column.max_def_level(),
                num_values,
                "definition",
            )?)
        } else {
            None
        };

        if num_values > 0 {
            value_decoder.set_data(buf)?;
        }

        Ok(PageState {
            num_values,
            values_read: 0,
            value_decoder,
            repetition_levels,
            definition_levels,
        })
    }
}

impl fmt::Debug for PageReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageReader")
            .field("column", self.column.path())
            .field("codec", &self.codec)
            .field("ready", &self.state.is_some())
            .field("done", &self.is_done())
            .finish()
    }
}

impl PageState {
    fn peek(&self) -> Result<Levels> {
        let idx = self.values_read;
        if idx >= self.num_values {
            return Err(StriderError::exhausted());
        }

        let repetition = self.repetition_levels.as_ref().map_or(0, |l| l[idx]);
        let definition = self.definition_levels.as_ref().map_or(0, |l| l[idx]);

        Ok(Levels::new(repetition, definition))
    }
}

/// Decode exactly `num_values` levels from the front of `buf`.
fn decode_levels(
    decoder: &mut dyn Decoder,
    buf: &mut Bytes,
    max_level: u16,
    num_values: usize,
    kind: &str,
) -> Result<Vec<u16>> {
    let mut levels = vec![0; num_values];
    let count = decoder.decode_levels(buf, level_bit_width(max_level), &mut levels)?;
    if count != num_values {
        return Err(StriderError::malformed(format!(
            "Expected {num_values} {kind} levels, got {count}"
        )));
    }

    if let Some(level) = levels.iter().find(|&&level| level > max_level) {
        return Err(StriderError::malformed(format!(
            "Decoded {kind} level {level} exceeds column max of {max_level}"
        )));
    }

    Ok(levels)
}

/// Fill `buf` from `source`, erroring if the source ends early.
fn read_full(source: &mut dyn Read, buf: &mut [u8]) -> Result<()> {
    let mut read = 0;
    while read < buf.len() {
        match source.read(&mut buf[read..]) {
            Ok(0) => {
                return Err(StriderError::malformed(format!(
                    "Short read for page data, expected {} bytes, got {read}",
                    buf.len()
                )))
            }
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
