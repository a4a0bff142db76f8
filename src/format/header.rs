//! Pak header structure, encoding and parsing.

use crate::{Error, Result};
use std::io::Cursor;

use super::reader::{read_u32_le, read_u64_le};
use super::{HEADER_SIZE, MAGIC, VERSION};

/// The fixed-size header at the start of every pak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PakHeader {
    /// Format version.
    pub version: u32,
    /// Number of records in the file table.
    pub entry_count: u32,
    /// Size of the file table in bytes.
    pub table_size: u32,
    /// Size of the data region in bytes.
    pub data_size: u64,
}

impl PakHeader {
    /// Creates a header for the current format version.
    pub fn new(entry_count: u32, table_size: u32, data_size: u64) -> Self {
        Self {
            version: VERSION,
            entry_count,
            table_size,
            data_size,
        }
    }

    /// Appends the encoded header to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.entry_count.to_le_bytes());
        out.extend_from_slice(&self.table_size.to_le_bytes());
        out.extend_from_slice(&self.data_size.to_le_bytes());
    }

    /// Parses the header at the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The magic bytes are missing or wrong ([`Error::InvalidFormat`])
    /// - The version is not [`VERSION`] ([`Error::UnsupportedVersion`])
    /// - The buffer is shorter than [`HEADER_SIZE`] ([`Error::CorruptTable`])
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < MAGIC.len() || &data[..MAGIC.len()] != MAGIC {
            return Err(Error::InvalidFormat("invalid pak signature".into()));
        }
        if (data.len() as u64) < HEADER_SIZE {
            return Err(Error::corrupt(
                data.len() as u64,
                format!(
                    "truncated header: {} of {} bytes",
                    data.len(),
                    HEADER_SIZE
                ),
            ));
        }

        let mut cursor = Cursor::new(&data[MAGIC.len()..HEADER_SIZE as usize]);
        let version = read_u32_le(&mut cursor)?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion { version });
        }
        let entry_count = read_u32_le(&mut cursor)?;
        let table_size = read_u32_le(&mut cursor)?;
        let data_size = read_u64_le(&mut cursor)?;

        Ok(Self {
            version,
            entry_count,
            table_size,
            data_size,
        })
    }

    /// Returns the byte position where the data region starts.
    pub fn data_offset(&self) -> u64 {
        HEADER_SIZE + self.table_size as u64
    }

    /// Returns the total archive length this header declares.
    ///
    /// `None` if the declared sizes overflow `u64`.
    pub fn archive_len(&self) -> Option<u64> {
        self.data_offset().checked_add(self.data_size)
    }
}
