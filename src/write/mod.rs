//! Archive building API.
//!
//! A build takes an ordered list of [`VirtualFile`]s and returns one
//! [`Archive`] buffer. Each call is independent: the builder keeps no state
//! between calls, so a single [`PakBuilder`] can be shared across threads.
//!
//! # Example
//!
//! ```rust
//! use modpak::{PakBuilder, PakOptions, PathCase, VirtualFile};
//!
//! let files = vec![
//!     VirtualFile::text("Mods/MyMod/meta.lsx", "<save/>"),
//!     VirtualFile::new("Mods/MyMod/preset.json", b"{}".to_vec()),
//! ];
//!
//! let archive = PakBuilder::new()
//!     .options(PakOptions::new().path_case(PathCase::Insensitive))
//!     .build(&files)?;
//! assert_eq!(archive.entry_count(), 2);
//! # Ok::<(), modpak::Error>(())
//! ```

mod layout;
mod options;

pub use options::{PakOptions, PathCase};

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Write;

use crate::format::header::PakHeader;
use crate::format::table::FileTableEntry;
use crate::{Error, PakPath, Result};

/// An in-memory file to be packed.
///
/// The path is normalized during the build; the content is only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile<'a> {
    /// Relative path inside the archive, as supplied by the caller.
    pub path: Cow<'a, str>,
    /// File content.
    pub content: Cow<'a, [u8]>,
}

impl<'a> VirtualFile<'a> {
    /// Creates a virtual file from a path and raw bytes.
    pub fn new(path: impl Into<Cow<'a, str>>, content: impl Into<Cow<'a, [u8]>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Creates a virtual file whose content is UTF-8 text.
    pub fn text(path: impl Into<Cow<'a, str>>, text: impl Into<Cow<'a, str>>) -> Self {
        let content = match text.into() {
            Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
            Cow::Owned(s) => Cow::Owned(s.into_bytes()),
        };
        Self {
            path: path.into(),
            content,
        }
    }
}

/// A finished pak archive.
///
/// Owns the encoded bytes together with the file table that describes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    bytes: Vec<u8>,
    entries: Vec<FileTableEntry>,
    data_offset: u64,
}

impl Archive {
    /// Returns the encoded archive.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the archive and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the file table, in data region order.
    pub fn entries(&self) -> &[FileTableEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the absolute byte position where the data region starts.
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Returns the data region size in bytes.
    pub fn data_len(&self) -> u64 {
        self.bytes.len() as u64 - self.data_offset
    }

    /// Returns the total archive size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the archive has no entries.
    ///
    /// An empty archive still carries a header.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the encoded archive to `sink`.
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<()> {
        sink.write_all(&self.bytes)?;
        sink.flush()?;
        Ok(())
    }
}

impl AsRef<[u8]> for Archive {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Archive> for Vec<u8> {
    fn from(archive: Archive) -> Self {
        archive.bytes
    }
}

/// Builds pak archives from virtual files.
#[derive(Debug, Clone, Default)]
pub struct PakBuilder {
    options: PakOptions,
}

impl PakBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the build options.
    pub fn options(mut self, options: PakOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the current build options.
    pub fn current_options(&self) -> &PakOptions {
        &self.options
    }

    /// Packs `files` into a single archive.
    ///
    /// Entries keep the caller's order in both the file table and the data
    /// region. Identical input always produces byte-identical output.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] if a path fails normalization
    /// - [`Error::DuplicatePath`] if two paths normalize to the same entry
    /// - [`Error::ResourceLimitExceeded`] if a configured limit is hit
    /// - [`Error::EncodingOverflow`] if a count, size or offset does not fit
    ///   its format field
    ///
    /// Every check runs before the output buffer is allocated; on error
    /// nothing is returned.
    pub fn build(&self, files: &[VirtualFile<'_>]) -> Result<Archive> {
        if let Some(max) = self.options.max_entries {
            if files.len() > max {
                return Err(Error::ResourceLimitExceeded(format!(
                    "{} entries exceeds limit of {}",
                    files.len(),
                    max
                )));
            }
        }

        let paths = files
            .iter()
            .enumerate()
            .map(|(index, file)| PakPath::new(&file.path).map_err(|e| e.at_index(index)))
            .collect::<Result<Vec<_>>>()?;

        self.check_duplicates(&paths)?;
        self.check_total_size(files)?;

        let layout = layout::plan(
            paths
                .into_iter()
                .zip(files.iter().map(|f| f.content.as_ref())),
        )?;

        let mut bytes = Vec::with_capacity(layout.archive_len);
        PakHeader::new(layout.entry_count, layout.table_size, layout.data_size).encode(&mut bytes);
        for entry in &layout.entries {
            entry.encode(&mut bytes)?;
        }
        let data_offset = bytes.len() as u64;
        for file in files {
            bytes.extend_from_slice(&file.content);
        }
        debug_assert_eq!(bytes.len(), layout.archive_len);

        log::debug!(
            "built pak: {} entries, {} table bytes, {} data bytes, {} total",
            layout.entry_count,
            layout.table_size,
            layout.data_size,
            bytes.len()
        );

        Ok(Archive {
            bytes,
            entries: layout.entries,
            data_offset,
        })
    }

    fn check_duplicates(&self, paths: &[PakPath]) -> Result<()> {
        let mut seen: HashMap<Cow<'_, str>, usize> = HashMap::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            let key = self.options.path_case.key(path.as_str());
            if let Some(&first_index) = seen.get(&key) {
                return Err(Error::DuplicatePath {
                    path: path.to_string(),
                    first_index,
                    second_index: index,
                });
            }
            seen.insert(key, index);
        }
        Ok(())
    }

    fn check_total_size(&self, files: &[VirtualFile<'_>]) -> Result<()> {
        let Some(max) = self.options.max_total_size else {
            return Ok(());
        };
        let total = files
            .iter()
            .fold(0u64, |acc, f| acc.saturating_add(f.content.len() as u64));
        if total > max {
            return Err(Error::ResourceLimitExceeded(format!(
                "total payload of {} bytes exceeds limit of {}",
                total, max
            )));
        }
        Ok(())
    }
}

/// Packs `files` into a single archive with default options.
///
/// Shorthand for `PakBuilder::new().build(files)`.
///
/// ```rust
/// use modpak::VirtualFile;
///
/// let archive = modpak::build(&[VirtualFile::text("meta.txt", "hello")])?;
/// assert_eq!(archive.entries()[0].offset, 0);
/// assert_eq!(archive.entries()[0].length, 5);
/// # Ok::<(), modpak::Error>(())
/// ```
pub fn build(files: &[VirtualFile<'_>]) -> Result<Archive> {
    PakBuilder::new().build(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{HEADER_SIZE, MAGIC, record_size};

    fn file<'a>(path: &'a str, content: &'a [u8]) -> VirtualFile<'a> {
        VirtualFile::new(path, content)
    }

    #[test]
    fn test_empty_build() {
        let archive = build(&[]).unwrap();
        assert!(archive.is_empty());
        assert_eq!(archive.len() as u64, HEADER_SIZE);
        assert_eq!(archive.data_offset(), HEADER_SIZE);
        assert_eq!(archive.data_len(), 0);
        assert_eq!(&archive.as_bytes()[0..4], MAGIC);
        assert_eq!(&archive.as_bytes()[8..12], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_single_file_layout() {
        let archive = build(&[file("meta.txt", b"hello")]).unwrap();
        let entries = archive.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path.as_str(), "meta.txt");
        assert_eq!(entries[0].offset, 0);
        assert_eq!(entries[0].length, 5);

        let data_offset = HEADER_SIZE + record_size("meta.txt".len());
        assert_eq!(archive.data_offset(), data_offset);
        assert_eq!(&archive.as_bytes()[data_offset as usize..], b"hello");
    }

    #[test]
    fn test_preserves_caller_order() {
        let archive = build(&[file("z.txt", b"1"), file("a.txt", b"22")]).unwrap();
        let names: Vec<_> = archive.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(names, vec!["z.txt", "a.txt"]);
        let start = archive.data_offset() as usize;
        assert_eq!(&archive.as_bytes()[start..], b"122");
    }

    #[test]
    fn test_normalizes_paths() {
        let archive = build(&[file("/Mods\\./x.txt", b"")]).unwrap();
        assert_eq!(archive.entries()[0].path.as_str(), "Mods/x.txt");
    }

    #[test]
    fn test_invalid_path_reports_index() {
        let err = build(&[file("ok.txt", b""), file("../secret", b"")]).unwrap_err();
        match err {
            Error::InvalidPath { index, path, .. } => {
                assert_eq!(index, Some(1));
                assert_eq!(path, "../secret");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_after_normalization() {
        let err = build(&[
            file("a/b.txt", b"1"),
            file("c.txt", b"2"),
            file("/a/./b.txt", b"3"),
        ])
        .unwrap_err();
        match err {
            Error::DuplicatePath {
                path,
                first_index,
                second_index,
            } => {
                assert_eq!(path, "a/b.txt");
                assert_eq!(first_index, 0);
                assert_eq!(second_index, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_windows_aliases_rejected() {
        let err = build(&[
            file("a/meta.lsx", b"1"),
            file("a/meta.lsx.", b"2"),
            file("a/meta.lsx ", b"3"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { index: Some(1), .. }));

        let err = build(&[file("ok", b""), file("C:/Windows/evil.dll", b"")]).unwrap_err();
        assert!(matches!(err, Error::InvalidPath { index: Some(1), .. }));
    }

    #[test]
    fn test_case_sensitive_by_default() {
        let archive = build(&[file("A.txt", b""), file("a.txt", b"")]).unwrap();
        assert_eq!(archive.entry_count(), 2);
    }

    #[test]
    fn test_case_insensitive_collision() {
        let builder =
            PakBuilder::new().options(PakOptions::new().path_case(PathCase::Insensitive));
        let err = builder
            .build(&[file("Data/A.txt", b""), file("data/a.TXT", b"")])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicatePath {
                first_index: 0,
                second_index: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_case_insensitive_keeps_stored_case() {
        let builder =
            PakBuilder::new().options(PakOptions::new().path_case(PathCase::Insensitive));
        let archive = builder.build(&[file("Data/A.txt", b"")]).unwrap();
        assert_eq!(archive.entries()[0].path.as_str(), "Data/A.txt");
    }

    #[test]
    fn test_max_entries() {
        let builder = PakBuilder::new().options(PakOptions::new().max_entries(1));
        let err = builder
            .build(&[file("a", b""), file("b", b"")])
            .unwrap_err();
        assert!(matches!(err, Error::ResourceLimitExceeded(_)));
        assert!(builder.build(&[file("a", b"")]).is_ok());
    }

    #[test]
    fn test_max_total_size() {
        let builder = PakBuilder::new().options(PakOptions::new().max_total_size(4));
        let err = builder
            .build(&[file("a", b"12"), file("b", b"345")])
            .unwrap_err();
        assert!(err.to_string().contains("5 bytes"));
        assert!(builder.build(&[file("a", b"1234")]).is_ok());
    }

    #[test]
    fn test_text_constructor() {
        let owned = VirtualFile::text("a", String::from("hi"));
        let borrowed = VirtualFile::text("a", "hi");
        assert_eq!(owned, borrowed);
        assert_eq!(borrowed.content.as_ref(), b"hi");
    }

    #[test]
    fn test_write_to() {
        let archive = build(&[file("a", b"xyz")]).unwrap();
        let mut sink = Vec::new();
        archive.write_to(&mut sink).unwrap();
        assert_eq!(sink, archive.as_bytes());
        assert_eq!(Vec::from(archive.clone()), sink);
    }

    #[test]
    fn test_builder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PakBuilder>();
        assert_send_sync::<Archive>();
    }
}
