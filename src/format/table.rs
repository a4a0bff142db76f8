//! File table records.

use crate::{Error, PakPath, Result};
use std::io::Cursor;
use std::ops::Range;

use super::reader::{read_bytes, read_u16_le, read_u32_le, read_u64_le};
use super::{HEADER_SIZE, MAX_PATH_BYTES};

/// One file table record: where an entry's payload lives in the data region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTableEntry {
    /// Normalized path of the entry.
    pub path: PakPath,
    /// Byte offset of the payload, relative to the start of the data region.
    pub offset: u64,
    /// Payload length in bytes.
    pub length: u64,
    /// CRC-32 of the payload.
    pub crc32: u32,
}

impl FileTableEntry {
    /// Returns the end of the payload (exclusive), relative to the data region.
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }

    /// Returns the payload's byte range within the data region.
    pub fn range(&self) -> Range<u64> {
        self.offset..self.end()
    }

    /// Appends the encoded record to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EncodingOverflow`] if the path does not fit the
    /// 16-bit length field.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        let path = self.path.as_str().as_bytes();
        let path_len = u16::try_from(path.len()).map_err(|_| Error::EncodingOverflow {
            field: "path length",
            value: path.len() as u64,
            max: MAX_PATH_BYTES,
        })?;

        out.extend_from_slice(&path_len.to_le_bytes());
        out.extend_from_slice(path);
        out.extend_from_slice(&self.offset.to_le_bytes());
        out.extend_from_slice(&self.length.to_le_bytes());
        out.extend_from_slice(&self.crc32.to_le_bytes());
        Ok(())
    }

    /// Parses one record from a cursor over the file table.
    ///
    /// Paths longer than `max_path_len` are rejected before they are read.
    /// Error offsets are absolute archive positions.
    pub(crate) fn parse(cursor: &mut Cursor<&[u8]>, max_path_len: usize) -> Result<Self> {
        let start = HEADER_SIZE + cursor.position();
        let truncated = |_| Error::corrupt(start, "truncated file table record");

        let path_len = read_u16_le(cursor).map_err(truncated)? as usize;
        if path_len > max_path_len {
            return Err(Error::ResourceLimitExceeded(format!(
                "path of {} bytes at offset {:#x} exceeds limit of {}",
                path_len, start, max_path_len
            )));
        }
        let raw = read_bytes(cursor, path_len).map_err(truncated)?;
        let offset = read_u64_le(cursor).map_err(truncated)?;
        let length = read_u64_le(cursor).map_err(truncated)?;
        let crc32 = read_u32_le(cursor).map_err(truncated)?;

        let raw = String::from_utf8(raw)
            .map_err(|_| Error::corrupt(start, "entry path is not valid UTF-8"))?;
        let path = PakPath::new(&raw).map_err(|e| Error::corrupt(start, e.to_string()))?;
        if path.as_str() != raw {
            return Err(Error::corrupt(
                start,
                format!("entry path '{}' is not normalized", raw.escape_debug()),
            ));
        }

        Ok(Self {
            path,
            offset,
            length,
            crc32,
        })
    }
}

/// Returns true if the cursor has consumed its whole buffer.
pub(crate) fn is_exhausted(cursor: &Cursor<&[u8]>) -> bool {
    cursor.position() == cursor.get_ref().len() as u64
}
