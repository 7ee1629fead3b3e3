//! Helpers for building synthetic pages in tests.

use std::io::Write;

use thrift::protocol::{TCompactOutputProtocol, TOutputProtocol};

use crate::compression::CompressionCodec;
use crate::encoding::varint::put_uleb128;
use crate::encoding::{level_bit_width, Encoding};
use crate::metadata::column::ColumnPath;
use crate::metadata::column_chunk::ColumnChunkMetadata;
use crate::page::PageType;
use crate::thrift_ext::TSerializable;
use crate::thrift_gen;

/// Write a compact encoded struct to `writer`.
pub fn write_compact<S: TSerializable, W: Write>(s: &S, writer: W) -> thrift::Result<()> {
    let mut o_prot = TCompactOutputProtocol::new(writer);
    s.write_to_out_protocol(&mut o_prot)?;
    o_prot.flush()
}

/// RLE/bit-packed hybrid encode `levels` with a 4 byte length prefix.
///
/// Groups of 8 identical values become repeated runs, everything else is bit
/// packed one group at a time.
pub fn encode_rle_levels(levels: &[u16], bit_width: u8) -> Vec<u8> {
    let bit_width = bit_width as usize;
    let mut runs = Vec::new();

    let mut chunks = levels.chunks(8).peekable();
    while let Some(chunk) = chunks.next() {
        if chunk.iter().all(|&v| v == chunk[0]) {
            let mut count = chunk.len();
            while let Some(next) = chunks.peek() {
                if next.iter().all(|&v| v == chunk[0]) {
                    count += next.len();
                    chunks.next();
                } else {
                    break;
                }
            }

            put_uleb128(&mut runs, (count as u64) << 1);
            let value = (chunk[0] as u32).to_le_bytes();
            runs.extend_from_slice(&value[..bit_width.div_ceil(8)]);
        } else {
            put_uleb128(&mut runs, (1 << 1) | 1);

            let mut packed = vec![0u8; bit_width];
            for (idx, &v) in chunk.iter().enumerate() {
                for bit in 0..bit_width {
                    if (v >> bit) & 1 == 1 {
                        let pos = idx * bit_width + bit;
                        packed[pos / 8] |= 1 << (pos % 8);
                    }
                }
            }
            runs.extend_from_slice(&packed);
        }
    }

    let mut out = (runs.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(&runs);
    out
}

pub fn plain_i32(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn plain_byte_arrays(values: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in values {
        out.extend_from_slice(&(v.len() as u32).to_le_bytes());
        out.extend_from_slice(v.as_bytes());
    }
    out
}

fn encoding_id(encoding: Encoding) -> i32 {
    match encoding {
        Encoding::Plain => 0,
        Encoding::PlainDictionary => 2,
        Encoding::Rle => 3,
        Encoding::BitPacked => 4,
        Encoding::DeltaBinaryPacked => 5,
        Encoding::DeltaLengthByteArray => 6,
        Encoding::DeltaByteArray => 7,
        Encoding::RleDictionary => 8,
        Encoding::ByteStreamSplit => 9,
    }
}

fn page_type_id(page_type: PageType) -> i32 {
    match page_type {
        PageType::DataPage => 0,
        PageType::IndexPage => 1,
        PageType::DictionaryPage => 2,
        PageType::DataPageV2 => 3,
    }
}

/// Builds a data page v1 (header and compressed payload).
#[derive(Debug, Clone)]
pub struct PageBuilder {
    num_values: usize,
    page_type: PageType,
    rep_levels: Vec<u8>,
    def_levels: Vec<u8>,
    /// Encoding written to the header for both level streams.
    level_encoding: Encoding,
    encoding: Encoding,
    values: Vec<u8>,
}

impl PageBuilder {
    pub fn new(num_values: usize) -> Self {
        PageBuilder {
            num_values,
            page_type: PageType::DataPage,
            rep_levels: Vec::new(),
            def_levels: Vec::new(),
            level_encoding: Encoding::Rle,
            encoding: Encoding::Plain,
            values: Vec::new(),
        }
    }

    pub fn page_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    pub fn rep_levels(mut self, levels: &[u16], max: u16) -> Self {
        self.rep_levels = encode_rle_levels(levels, level_bit_width(max));
        self
    }

    pub fn def_levels(mut self, levels: &[u16], max: u16) -> Self {
        self.def_levels = encode_rle_levels(levels, level_bit_width(max));
        self
    }

    /// Use already encoded repetition levels, written as is.
    pub fn raw_rep_levels(mut self, encoded: Vec<u8>) -> Self {
        self.rep_levels = encoded;
        self
    }

    /// Use already encoded definition levels, written as is.
    pub fn raw_def_levels(mut self, encoded: Vec<u8>) -> Self {
        self.def_levels = encoded;
        self
    }

    /// Set the level encoding in the header. Doesn't re-encode levels.
    pub fn level_encoding(mut self, encoding: Encoding) -> Self {
        self.level_encoding = encoding;
        self
    }

    pub fn values(mut self, encoding: Encoding, values: Vec<u8>) -> Self {
        self.encoding = encoding;
        self.values = values;
        self
    }

    pub fn build(&self, codec: CompressionCodec) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&self.rep_levels);
        payload.extend_from_slice(&self.def_levels);
        payload.extend_from_slice(&self.values);

        let compressed = match codec {
            CompressionCodec::Uncompressed => payload.clone(),
            CompressionCodec::Snappy => snap::raw::Encoder::new().compress_vec(&payload).unwrap(),
            other => panic!("unsupported test codec: {other:?}"),
        };

        let header = thrift_gen::PageHeader {
            type_: page_type_id(self.page_type),
            uncompressed_page_size: payload.len() as i32,
            compressed_page_size: compressed.len() as i32,
            crc: None,
            data_page_header: Some(thrift_gen::DataPageHeader {
                num_values: self.num_values as i32,
                encoding: encoding_id(self.encoding),
                definition_level_encoding: encoding_id(self.level_encoding),
                repetition_level_encoding: encoding_id(self.level_encoding),
            }),
        };

        let mut out = Vec::new();
        write_compact(&header, &mut out).unwrap();
        out.extend_from_slice(&compressed);
        out
    }
}

/// Lays out column chunks back to back in a single buffer.
#[derive(Debug, Default)]
pub struct FileWriter {
    data: Vec<u8>,
}

impl FileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column chunk made up of `pages`, returning metadata pointing
    /// at it.
    pub fn chunk(
        &mut self,
        path: &[&str],
        pages: &[PageBuilder],
        codec: CompressionCodec,
    ) -> ColumnChunkMetadata {
        let offset = self.data.len() as i64;
        let mut num_values = 0;
        for page in pages {
            self.data.extend(page.build(codec));
            num_values += page.num_values as i64;
        }
        ColumnChunkMetadata::new(ColumnPath::new(path.iter().copied()), offset, num_values, codec)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
