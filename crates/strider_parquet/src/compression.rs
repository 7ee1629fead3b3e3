use std::fmt::Debug;

use strider_error::{ErrorKind, Result, ResultExt, StriderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionCodec {
    Uncompressed,
    Snappy,
    Gzip,
    Lzo,
    Brotli,
    Lz4,
    Zstd,
    Lz4Raw,
}

impl CompressionCodec {
    /// Convert from the codec id used in the thrift definitions.
    pub fn try_from_thrift(id: i32) -> Result<Self> {
        Ok(match id {
            0 => Self::Uncompressed,
            1 => Self::Snappy,
            2 => Self::Gzip,
            3 => Self::Lzo,
            4 => Self::Brotli,
            5 => Self::Lz4,
            6 => Self::Zstd,
            7 => Self::Lz4Raw,
            other => {
                return Err(StriderError::malformed(format!(
                    "Unknown compression codec id: {other}"
                )))
            }
        })
    }
}

/// Decompresses a page.
pub trait Codec: Debug + Send {
    /// Decompress all of `input` into `output`.
    ///
    /// `output` is sized to the expected uncompressed length, and must be
    /// filled exactly. Producing more or fewer bytes is an error.
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<()>;
}

/// Get the codec implementation for `codec`.
///
/// Codecs without an implementation (or whose feature isn't enabled) return an
/// `Unsupported` error. Nothing is passed through as-is.
pub fn get_codec(codec: CompressionCodec) -> Result<Box<dyn Codec>> {
    match codec {
        CompressionCodec::Snappy => Ok(Box::new(SnappyCodec)),
        CompressionCodec::Uncompressed => Ok(Box::new(UncompressedCodec)),
        #[cfg(feature = "gzip")]
        CompressionCodec::Gzip => Ok(Box::new(GzipCodec)),
        #[cfg(feature = "zstd")]
        CompressionCodec::Zstd => Ok(Box::new(ZstdCodec)),
        other => Err(StriderError::unsupported(format!(
            "Unsupported compression codec: {other:?}"
        ))),
    }
}

fn check_len(codec: &str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(StriderError::malformed(format!(
            "{codec} decompressed to {got} bytes, expected {expected}"
        )));
    }
    Ok(())
}

#[derive(Debug)]
pub struct SnappyCodec;

impl Codec for SnappyCodec {
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        let len = snap::raw::decompress_len(input)
            .context("failed to read snappy decompressed length")
            .map_err(|e| e.with_kind(ErrorKind::Malformed))?;
        check_len("Snappy", output.len(), len)?;

        let n = snap::raw::Decoder::new()
            .decompress(input, output)
            .context("failed to decompress snappy page")
            .map_err(|e| e.with_kind(ErrorKind::Malformed))?;
        check_len("Snappy", output.len(), n)
    }
}

#[derive(Debug)]
pub struct UncompressedCodec;

impl Codec for UncompressedCodec {
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        check_len("Uncompressed page", output.len(), input.len())?;
        output.copy_from_slice(input);
        Ok(())
    }
}

#[cfg(feature = "gzip")]
#[derive(Debug)]
pub struct GzipCodec;

#[cfg(feature = "gzip")]
impl Codec for GzipCodec {
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        use std::io::Read;

        let mut decoder = flate2::read::GzDecoder::new(input);
        decoder
            .read_exact(output)
            .context("failed to decompress gzip page")
            .map_err(|e| e.with_kind(ErrorKind::Malformed))?;

        // Make sure there's nothing left over.
        let mut extra = [0; 1];
        let n = decoder
            .read(&mut extra)
            .context("failed to decompress gzip page")
            .map_err(|e| e.with_kind(ErrorKind::Malformed))?;
        if n != 0 {
            return Err(StriderError::malformed(format!(
                "Gzip decompressed to more than {} bytes",
                output.len()
            )));
        }

        Ok(())
    }
}

#[cfg(feature = "zstd")]
#[derive(Debug)]
pub struct ZstdCodec;

#[cfg(feature = "zstd")]
impl Codec for ZstdCodec {
    fn decompress(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        let n = zstd::bulk::decompress_to_buffer(input, output)
            .context("failed to decompress zstd page")
            .map_err(|e| e.with_kind(ErrorKind::Malformed))?;
        check_len("Zstd", output.len(), n)
    }
}
