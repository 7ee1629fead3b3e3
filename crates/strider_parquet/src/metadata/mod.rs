//! Metadata describing a file, its row groups, and its columns.
//!
//! Decoding the footer into these types happens elsewhere. Everything in here
//! is plain data that the readers consume read-only.

pub mod column;
pub mod column_chunk;
pub mod file;
pub mod row_group;
pub mod schema;
