//! Archive reading API.
//!
//! [`PakReader`] parses a pak from a byte slice and checks every structural
//! invariant the builder guarantees: header sizes match the buffer, table
//! ranges are in bounds, packed back to back and cover the data region
//! exactly, and names are normalized and unique.
//!
//! # Example
//!
//! ```rust
//! use modpak::{PakReader, VirtualFile};
//!
//! let archive = modpak::build(&[VirtualFile::text("meta.txt", "hello")])?;
//!
//! let reader = PakReader::parse(archive.as_bytes())?;
//! assert_eq!(reader.read("meta.txt")?, b"hello");
//! # Ok::<(), modpak::Error>(())
//! ```

mod options;

pub use options::ReadOptions;

use std::collections::HashMap;
use std::io::Cursor;

use crate::format::header::PakHeader;
use crate::format::table::{FileTableEntry, is_exhausted};
use crate::format::{HEADER_SIZE, RECORD_FIXED_SIZE};
use crate::{Error, PakPath, Result};

/// A parsed, validated view of a pak archive.
///
/// Payloads are borrowed from the parsed buffer; nothing is copied.
#[derive(Debug)]
pub struct PakReader<'a> {
    data: &'a [u8],
    header: PakHeader,
    entries: Vec<FileTableEntry>,
    index: HashMap<PakPath, usize>,
    verify_checksums: bool,
}

impl<'a> PakReader<'a> {
    /// Parses an archive with default options.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        Self::parse_with(data, &ReadOptions::default())
    }

    /// Parses an archive with the given options.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidFormat`] if the signature is wrong
    /// - [`Error::UnsupportedVersion`] for other format versions
    /// - [`Error::CorruptTable`] for any structural inconsistency
    /// - [`Error::ResourceLimitExceeded`] if a limit in `options` is hit
    pub fn parse_with(data: &'a [u8], options: &ReadOptions) -> Result<Self> {
        let header = PakHeader::parse(data)?;

        let count = header.entry_count as usize;
        if count > options.max_entries {
            return Err(Error::ResourceLimitExceeded(format!(
                "{} entries exceeds limit of {}",
                count, options.max_entries
            )));
        }

        let archive_len = header
            .archive_len()
            .ok_or_else(|| Error::corrupt(12, "declared table and data sizes overflow"))?;
        let actual_len = data.len() as u64;
        if actual_len < archive_len {
            return Err(Error::corrupt(
                actual_len,
                format!(
                    "truncated archive: header declares {} bytes, found {}",
                    archive_len, actual_len
                ),
            ));
        }
        if actual_len > archive_len {
            return Err(Error::corrupt(
                archive_len,
                format!("{} trailing bytes after data region", actual_len - archive_len),
            ));
        }

        let data_offset = header.data_offset();
        let table = &data[HEADER_SIZE as usize..data_offset as usize];
        let mut cursor = Cursor::new(table);

        let capacity = count.min(table.len() / RECORD_FIXED_SIZE as usize);
        let mut entries: Vec<FileTableEntry> = Vec::with_capacity(capacity);
        let mut index = HashMap::with_capacity(capacity);
        let mut expected_offset = 0u64;

        for i in 0..count {
            let record_start = HEADER_SIZE + cursor.position();
            let entry = FileTableEntry::parse(&mut cursor, options.max_path_len)?;

            if entry.offset != expected_offset {
                return Err(Error::corrupt(
                    record_start,
                    format!(
                        "entry {} starts at data offset {}, expected {}",
                        i, entry.offset, expected_offset
                    ),
                ));
            }
            expected_offset = entry
                .offset
                .checked_add(entry.length)
                .filter(|&end| end <= header.data_size)
                .ok_or_else(|| {
                    Error::corrupt(
                        record_start,
                        format!("entry {} extends past the data region", i),
                    )
                })?;

            if let Some(first) = index.insert(entry.path.clone(), i) {
                return Err(Error::corrupt(
                    record_start,
                    format!(
                        "entry {} duplicates path '{}' of entry {}",
                        i, entry.path, first
                    ),
                ));
            }
            entries.push(entry);
        }

        if !is_exhausted(&cursor) {
            return Err(Error::corrupt(
                HEADER_SIZE + cursor.position(),
                format!(
                    "{} unused bytes at end of file table",
                    table.len() as u64 - cursor.position()
                ),
            ));
        }
        if expected_offset != header.data_size {
            return Err(Error::corrupt(
                data_offset + expected_offset,
                format!(
                    "{} bytes of data region not covered by any entry",
                    header.data_size - expected_offset
                ),
            ));
        }

        log::debug!(
            "parsed pak: {} entries, {} table bytes, {} data bytes",
            entries.len(),
            header.table_size,
            header.data_size
        );

        Ok(Self {
            data,
            header,
            entries,
            index,
            verify_checksums: options.verify_checksums,
        })
    }

    /// Returns the parsed header.
    pub fn header(&self) -> &PakHeader {
        &self.header
    }

    /// Returns the file table, in data region order.
    pub fn entries(&self) -> &[FileTableEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by path.
    ///
    /// The query is normalized first, so `"/a\\b"` finds `"a/b"`. Returns
    /// the entry's table index along with the entry.
    pub fn find(&self, path: &str) -> Option<(usize, &FileTableEntry)> {
        let path = PakPath::new(path).ok()?;
        let &i = self.index.get(&path)?;
        Some((i, &self.entries[i]))
    }

    /// Returns the raw payload of the entry at `index`, without verification.
    pub fn data(&self, index: usize) -> Option<&'a [u8]> {
        let entry = self.entries.get(index)?;
        let start = (self.header.data_offset() + entry.offset) as usize;
        Some(&self.data[start..start + entry.length as usize])
    }

    /// Returns the payload of the entry with the given path.
    ///
    /// # Errors
    ///
    /// - [`Error::EntryNotFound`] if no entry has this path
    /// - [`Error::CrcMismatch`] if checksum verification is enabled and the
    ///   payload does not match
    pub fn read(&self, path: &str) -> Result<&'a [u8]> {
        let (i, _) = self
            .find(path)
            .ok_or_else(|| Error::EntryNotFound(path.to_string()))?;
        self.read_index(i)
    }

    /// Returns the payload of the entry at `index`.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn read_index(&self, index: usize) -> Result<&'a [u8]> {
        let payload = self
            .data(index)
            .ok_or_else(|| Error::EntryNotFound(format!("#{}", index)))?;
        if self.verify_checksums {
            self.check(index, payload)?;
        }
        Ok(payload)
    }

    /// Verifies the checksum of every entry, regardless of options.
    pub fn verify(&self) -> Result<()> {
        for (i, (_, payload)) in self.iter().enumerate() {
            self.check(i, payload)?;
        }
        log::debug!("verified {} entries", self.entries.len());
        Ok(())
    }

    /// Iterates over entries with their raw payloads.
    pub fn iter(&self) -> impl Iterator<Item = (&FileTableEntry, &'a [u8])> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| self.data(i).map(|payload| (entry, payload)))
    }

    fn check(&self, index: usize, payload: &[u8]) -> Result<()> {
        let entry = &self.entries[index];
        let actual = crc32fast::hash(payload);
        if actual != entry.crc32 {
            return Err(Error::CrcMismatch {
                entry_index: index,
                entry_name: Some(entry.path.to_string()),
                expected: entry.crc32,
                actual,
            });
        }
        Ok(())
    }
}
