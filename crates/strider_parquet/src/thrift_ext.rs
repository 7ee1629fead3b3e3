use std::io::Read;

use strider_error::{ErrorKind, Result, ResultExt};
use thrift::protocol::{TCompactInputProtocol, TInputProtocol, TOutputProtocol};

/// Reads and writes the struct to Thrift protocols.
///
/// Unlike [`thrift::protocol::TSerializable`] this uses generics instead of trait objects
pub trait TSerializable: Sized {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self>;
    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()>;
}

/// Read a compact encoded struct from `reader`.
///
/// The compact protocol reads byte by byte, so `reader` is left positioned
/// directly after the struct.
pub fn read_compact<S: TSerializable, R: Read>(reader: R) -> Result<S> {
    let mut i_prot = TCompactInputProtocol::new(reader);
    S::read_from_in_protocol(&mut i_prot)
        .context("Failed to read thrift struct")
        .map_err(|e| e.with_kind(ErrorKind::Malformed))
}
