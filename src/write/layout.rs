//! Offset and size computation for the file table and data region.

use crate::format::table::FileTableEntry;
use crate::format::{HEADER_SIZE, MAX_ENTRY_COUNT, MAX_TABLE_SIZE, record_size};
use crate::{Error, PakPath, Result};

/// A fully computed archive layout, ready to be serialized.
#[derive(Debug)]
pub(crate) struct Layout {
    /// Table records in input order.
    pub entries: Vec<FileTableEntry>,
    /// Entry count as stored in the header.
    pub entry_count: u32,
    /// File table size in bytes.
    pub table_size: u32,
    /// Data region size in bytes.
    pub data_size: u64,
    /// Total archive size in bytes.
    pub archive_len: usize,
}

fn overflow(field: &'static str, value: u64, max: u64) -> Error {
    Error::EncodingOverflow { field, value, max }
}

/// Computes the layout for normalized paths paired with their payloads.
///
/// Payload offsets are data-region-relative and packed back to back:
/// `offset(i)` is the sum of the lengths of entries `0..i`.
pub(crate) fn plan<'a, I>(items: I) -> Result<Layout>
where
    I: ExactSizeIterator<Item = (PakPath, &'a [u8])>,
{
    let count = items.len() as u64;
    if count > MAX_ENTRY_COUNT {
        return Err(overflow("entry count", count, MAX_ENTRY_COUNT));
    }

    let mut entries = Vec::with_capacity(items.len());
    let mut table_size = 0u64;
    let mut offset = 0u64;

    for (path, content) in items {
        table_size += record_size(path.as_str().len());
        if table_size > MAX_TABLE_SIZE {
            return Err(overflow("file table size", table_size, MAX_TABLE_SIZE));
        }

        let length = content.len() as u64;
        let entry = FileTableEntry {
            path,
            offset,
            length,
            crc32: crc32fast::hash(content),
        };
        log::trace!(
            "entry {}: '{}' at {} ({} bytes, crc {:#010x})",
            entries.len(),
            entry.path,
            entry.offset,
            entry.length,
            entry.crc32
        );

        offset = offset
            .checked_add(length)
            .ok_or_else(|| overflow("data region size", u64::MAX, u64::MAX))?;
        entries.push(entry);
    }

    let archive_len = (HEADER_SIZE + table_size)
        .checked_add(offset)
        .ok_or_else(|| overflow("archive size", u64::MAX, u64::MAX))?;
    let archive_len = usize::try_from(archive_len)
        .map_err(|_| overflow("archive size", archive_len, usize::MAX as u64))?;

    Ok(Layout {
        entries,
        entry_count: count as u32,
        table_size: table_size as u32,
        data_size: offset,
        archive_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items<'a>(files: &'a [(&str, &'a [u8])]) -> impl ExactSizeIterator<Item = (PakPath, &'a [u8])> {
        files
            .iter()
            .map(|(p, c)| (PakPath::new(p).unwrap(), *c))
    }

    #[test]
    fn test_empty_layout() {
        let layout = plan(items(&[])).unwrap();
        assert!(layout.entries.is_empty());
        assert_eq!(layout.entry_count, 0);
        assert_eq!(layout.table_size, 0);
        assert_eq!(layout.data_size, 0);
        assert_eq!(layout.archive_len as u64, HEADER_SIZE);
    }

    #[test]
    fn test_offsets_are_prefix_sums() {
        let files: [(&str, &[u8]); 3] = [("a", b"xx"), ("b", b""), ("c", b"yyy")];
        let layout = plan(items(&files)).unwrap();

        let offsets: Vec<_> = layout.entries.iter().map(|e| e.offset).collect();
        let lengths: Vec<_> = layout.entries.iter().map(|e| e.length).collect();
        assert_eq!(offsets, vec![0, 2, 2]);
        assert_eq!(lengths, vec![2, 0, 3]);
        assert_eq!(layout.data_size, 5);
        assert_eq!(layout.table_size as u64, 3 * record_size(1));
        assert_eq!(
            layout.archive_len as u64,
            HEADER_SIZE + layout.table_size as u64 + 5
        );
    }

    #[test]
    fn test_records_checksums() {
        let files: [(&str, &[u8]); 1] = [("meta.txt", b"hello")];
        let layout = plan(items(&files)).unwrap();
        assert_eq!(layout.entries[0].crc32, crc32fast::hash(b"hello"));
    }
}
