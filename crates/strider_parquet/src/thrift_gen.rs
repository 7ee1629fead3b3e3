//! Thrift structs for page headers.
//!
//! Only the fields the reader needs are kept, everything else (statistics,
//! dictionary/index/v2 headers) is skipped when reading.
//!
//! See <https://github.com/apache/parquet-format/blob/master/src/main/thrift/parquet.thrift>

use thrift::protocol::{
    field_id,
    verify_required_field_exists,
    TFieldIdentifier,
    TInputProtocol,
    TOutputProtocol,
    TStructIdentifier,
    TType,
};

use crate::thrift_ext::TSerializable;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DataPageHeader {
    /// Number of values, including NULLs, in this data page.
    pub num_values: i32,
    /// Encoding used for this data page.
    pub encoding: i32,
    /// Encoding used for definition levels.
    pub definition_level_encoding: i32,
    /// Encoding used for repetition levels.
    pub repetition_level_encoding: i32,
}

impl TSerializable for DataPageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i32> = None;
        let mut f_2: Option<i32> = None;
        let mut f_3: Option<i32> = None;
        let mut f_4: Option<i32> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            let field_id = field_id(&field_ident)?;
            match field_id {
                1 => f_1 = Some(i_prot.read_i32()?),
                2 => f_2 = Some(i_prot.read_i32()?),
                3 => f_3 = Some(i_prot.read_i32()?),
                4 => f_4 = Some(i_prot.read_i32()?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("DataPageHeader.num_values", &f_1)?;
        verify_required_field_exists("DataPageHeader.encoding", &f_2)?;
        verify_required_field_exists("DataPageHeader.definition_level_encoding", &f_3)?;
        verify_required_field_exists("DataPageHeader.repetition_level_encoding", &f_4)?;
        Ok(DataPageHeader {
            num_values: f_1.unwrap_or_default(),
            encoding: f_2.unwrap_or_default(),
            definition_level_encoding: f_3.unwrap_or_default(),
            repetition_level_encoding: f_4.unwrap_or_default(),
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("DataPageHeader"))?;
        write_i32_field(o_prot, "num_values", 1, self.num_values)?;
        write_i32_field(o_prot, "encoding", 2, self.encoding)?;
        write_i32_field(
            o_prot,
            "definition_level_encoding",
            3,
            self.definition_level_encoding,
        )?;
        write_i32_field(
            o_prot,
            "repetition_level_encoding",
            4,
            self.repetition_level_encoding,
        )?;
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PageHeader {
    /// The type of the page, indicates which of the *_header fields is set.
    pub type_: i32,
    /// Uncompressed page size in bytes (not including this header).
    pub uncompressed_page_size: i32,
    /// Compressed (and potentially encrypted) page size in bytes, not
    /// including this header.
    pub compressed_page_size: i32,
    /// The 32-bit CRC checksum for the page, if written.
    pub crc: Option<i32>,
    pub data_page_header: Option<DataPageHeader>,
}

impl TSerializable for PageHeader {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_struct_begin()?;
        let mut f_1: Option<i32> = None;
        let mut f_2: Option<i32> = None;
        let mut f_3: Option<i32> = None;
        let mut f_4: Option<i32> = None;
        let mut f_5: Option<DataPageHeader> = None;
        loop {
            let field_ident = i_prot.read_field_begin()?;
            if field_ident.field_type == TType::Stop {
                break;
            }
            let field_id = field_id(&field_ident)?;
            match field_id {
                1 => f_1 = Some(i_prot.read_i32()?),
                2 => f_2 = Some(i_prot.read_i32()?),
                3 => f_3 = Some(i_prot.read_i32()?),
                4 => f_4 = Some(i_prot.read_i32()?),
                5 => f_5 = Some(DataPageHeader::read_from_in_protocol(i_prot)?),
                _ => i_prot.skip(field_ident.field_type)?,
            }
            i_prot.read_field_end()?;
        }
        i_prot.read_struct_end()?;
        verify_required_field_exists("PageHeader.type_", &f_1)?;
        verify_required_field_exists("PageHeader.uncompressed_page_size", &f_2)?;
        verify_required_field_exists("PageHeader.compressed_page_size", &f_3)?;
        Ok(PageHeader {
            type_: f_1.unwrap_or_default(),
            uncompressed_page_size: f_2.unwrap_or_default(),
            compressed_page_size: f_3.unwrap_or_default(),
            crc: f_4,
            data_page_header: f_5,
        })
    }

    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_struct_begin(&TStructIdentifier::new("PageHeader"))?;
        write_i32_field(o_prot, "type_", 1, self.type_)?;
        write_i32_field(o_prot, "uncompressed_page_size", 2, self.uncompressed_page_size)?;
        write_i32_field(o_prot, "compressed_page_size", 3, self.compressed_page_size)?;
        if let Some(crc) = self.crc {
            write_i32_field(o_prot, "crc", 4, crc)?;
        }
        if let Some(header) = &self.data_page_header {
            o_prot.write_field_begin(&TFieldIdentifier::new(
                "data_page_header",
                TType::Struct,
                5,
            ))?;
            header.write_to_out_protocol(o_prot)?;
            o_prot.write_field_end()?;
        }
        o_prot.write_field_stop()?;
        o_prot.write_struct_end()
    }
}

fn write_i32_field<T: TOutputProtocol>(
    o_prot: &mut T,
    name: &str,
    id: i16,
    value: i32,
) -> thrift::Result<()> {
    o_prot.write_field_begin(&TFieldIdentifier::new(name, TType::I32, id))?;
    o_prot.write_i32(value)?;
    o_prot.write_field_end()
}
