//! Pak container format constants and low-level encoding.
//!
//! # Layout
//!
//! All integers are little-endian.
//!
//! ```text
//! +---------------------------+ 0
//! | header (24 bytes)         |
//! |   magic        [u8; 4]    |
//! |   version      u32        |
//! |   entry_count  u32        |
//! |   table_size   u32        |
//! |   data_size    u64        |
//! +---------------------------+ 24
//! | file table                |
//! |   per entry, input order: |
//! |   path_len     u16        |
//! |   path         [u8; n]    |
//! |   offset       u64        |
//! |   length       u64        |
//! |   crc32        u32        |
//! +---------------------------+ 24 + table_size
//! | data region               |
//! |   payloads, table order   |
//! +---------------------------+ 24 + table_size + data_size
//! ```
//!
//! Record offsets are relative to the start of the data region, so the
//! first entry always sits at offset 0. Payloads are packed with no
//! alignment padding, and nothing follows the data region.

pub mod header;
pub mod reader;
pub mod table;

/// The pak file signature (magic bytes).
pub const MAGIC: &[u8; 4] = b"MPAK";

/// Format version written by this crate and the only one it reads.
pub const VERSION: u32 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: u64 = 24;

/// Size of a table record excluding the path bytes.
///
/// 2 bytes path length + 8 bytes offset + 8 bytes length + 4 bytes CRC.
pub const RECORD_FIXED_SIZE: u64 = 22;

/// Largest entry count the header can declare.
pub const MAX_ENTRY_COUNT: u64 = u32::MAX as u64;

/// Largest file table the header can declare, in bytes.
pub const MAX_TABLE_SIZE: u64 = u32::MAX as u64;

/// Longest path a table record can carry, in bytes.
pub const MAX_PATH_BYTES: u64 = u16::MAX as u64;

/// Returns the encoded size of a table record whose path is `path_len` bytes.
#[inline]
pub fn record_size(path_len: usize) -> u64 {
    RECORD_FIXED_SIZE + path_len as u64
}
