//! Error types for pak archive operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when building or reading pak archives, along with a
//! convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! Every fallible operation in this crate returns `Result<T, Error>`. Build
//! errors are input-validation failures: they are detected before any output
//! is produced and there is nothing transient to retry.
//!
//! ```rust
//! use modpak::{Error, VirtualFile};
//!
//! let files = [
//!     VirtualFile::new("a/b.txt", b"one".as_slice()),
//!     VirtualFile::new("a/b.txt", b"two".as_slice()),
//! ];
//!
//! match modpak::build(&files) {
//!     Ok(archive) => println!("{} bytes", archive.len()),
//!     Err(Error::DuplicatePath { path, first_index, second_index }) => {
//!         eprintln!("'{}' appears at {} and {}", path, first_index, second_index);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

/// Helper struct for formatting InvalidPath error messages.
struct InvalidPathDisplay<'a> {
    index: Option<usize>,
    path: &'a str,
    reason: &'a str,
}

impl std::fmt::Display for InvalidPathDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid path")?;
        if let Some(idx) = self.index {
            write!(f, " for entry {}", idx)?;
        }
        write!(f, " '{}': {}", self.path.escape_debug(), self.reason)
    }
}

/// Helper struct for formatting CrcMismatch error messages.
struct CrcMismatchDisplay<'a> {
    entry_index: usize,
    entry_name: Option<&'a str>,
    expected: u32,
    actual: u32,
}

impl std::fmt::Display for CrcMismatchDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CRC mismatch for entry {}", self.entry_index)?;
        if let Some(name) = self.entry_name {
            write!(f, " ({})", name)?;
        }
        write!(f, ": expected {:#x}, got {:#x}", self.expected, self.actual)
    }
}

/// The main error type for pak archive operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Input | [`InvalidPath`][Self::InvalidPath], [`DuplicatePath`][Self::DuplicatePath] | Caller-supplied paths |
/// | Limits | [`EncodingOverflow`][Self::EncodingOverflow], [`ResourceLimitExceeded`][Self::ResourceLimitExceeded] | Field widths, configured caps |
/// | Format | [`InvalidFormat`][Self::InvalidFormat], [`UnsupportedVersion`][Self::UnsupportedVersion], [`CorruptTable`][Self::CorruptTable] | Invalid archive data |
/// | Integrity | [`CrcMismatch`][Self::CrcMismatch] | Data corruption |
/// | Lookup | [`EntryNotFound`][Self::EntryNotFound] | Missing entry |
/// | I/O | [`Io`][Self::Io] | Writing the finished archive |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while writing a finished archive.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A path failed normalization.
    ///
    /// Returned when a path is empty (before or after normalization),
    /// contains a NUL byte, has an empty segment, climbs above the archive
    /// root with `..`, or names a reserved device.
    #[error("{}", InvalidPathDisplay { index: *index, path, reason })]
    InvalidPath {
        /// Position of the offending entry in the build input, if known.
        index: Option<usize>,
        /// The path as supplied.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// Two entries normalize to the same path.
    ///
    /// The archive consumer has no defined tie-break, so duplicates are
    /// rejected rather than overwritten.
    #[error("Duplicate path '{path}' at entries {first_index} and {second_index}")]
    DuplicatePath {
        /// The normalized path shared by both entries.
        path: String,
        /// Index of the first entry with this path.
        first_index: usize,
        /// Index of the colliding entry.
        second_index: usize,
    },

    /// A count, size, or offset does not fit the field the format gives it.
    #[error("{field} value {value} exceeds format limit of {max}")]
    EncodingOverflow {
        /// Name of the format field.
        field: &'static str,
        /// The value that did not fit (saturated at `u64::MAX`).
        value: u64,
        /// Largest value the field can hold.
        max: u64,
    },

    /// A configured resource limit was exceeded.
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),

    /// The buffer is not a pak archive.
    #[error("Invalid pak format: {0}")]
    InvalidFormat(String),

    /// The archive declares a format version this build cannot read.
    #[error("Unsupported pak version {version}")]
    UnsupportedVersion {
        /// The version found in the header.
        version: u32,
    },

    /// The header or file table is inconsistent or truncated.
    ///
    /// The offset is the byte position in the archive where the problem
    /// was detected.
    #[error("Corrupt file table at offset {offset:#x}: {reason}")]
    CorruptTable {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// A description of the corruption.
        reason: String,
    },

    /// An entry's payload does not match its recorded checksum.
    #[error("{}", CrcMismatchDisplay { entry_index: *entry_index, entry_name: entry_name.as_deref(), expected: *expected, actual: *actual })]
    CrcMismatch {
        /// Index of the entry in the file table.
        entry_index: usize,
        /// Path of the entry, if known.
        entry_name: Option<String>,
        /// CRC recorded in the file table.
        expected: u32,
        /// CRC of the payload bytes.
        actual: u32,
    },

    /// No entry with the requested path exists.
    #[error("Entry not found: {0}")]
    EntryNotFound(String),
}

impl Error {
    /// Attaches an input index to an [`Error::InvalidPath`].
    ///
    /// Other variants are returned unchanged.
    pub(crate) fn at_index(self, index: usize) -> Self {
        match self {
            Self::InvalidPath { path, reason, .. } => Self::InvalidPath {
                index: Some(index),
                path,
                reason,
            },
            other => other,
        }
    }

    pub(crate) fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        Self::CorruptTable {
            offset,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a data corruption error.
    ///
    /// Corruption errors indicate the archive bytes are damaged.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::CrcMismatch { .. } | Error::CorruptTable { .. }
        )
    }

    /// Returns `true` if the build input was rejected.
    ///
    /// These errors come from caller-supplied paths and are fixed by
    /// changing the input, not by retrying.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidPath { .. } | Error::DuplicatePath { .. }
        )
    }

    /// Returns the input or table index associated with this error, if any.
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            Error::InvalidPath { index, .. } => *index,
            Error::DuplicatePath { second_index, .. } => Some(*second_index),
            Error::CrcMismatch { entry_index, .. } => Some(*entry_index),
            _ => None,
        }
    }
}

/// A specialized Result type for pak operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_display_with_index() {
        let err = Error::InvalidPath {
            index: Some(3),
            path: "../secret".into(),
            reason: "'..' segment not allowed (path traversal)".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("entry 3"));
        assert!(msg.contains("../secret"));
        assert!(msg.contains("traversal"));
    }

    #[test]
    fn test_invalid_path_display_escapes_nul() {
        let err = Error::InvalidPath {
            index: None,
            path: "a\0b".into(),
            reason: "contains NUL byte".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a\\0b"));
        assert!(!msg.contains("entry"));
    }

    #[test]
    fn test_at_index_only_touches_invalid_path() {
        let err = Error::InvalidPath {
            index: None,
            path: "x".into(),
            reason: "r".into(),
        }
        .at_index(7);
        assert!(matches!(err, Error::InvalidPath { index: Some(7), .. }));

        let err = Error::EntryNotFound("x".into()).at_index(7);
        assert!(matches!(err, Error::EntryNotFound(_)));
    }

    #[test]
    fn test_duplicate_path_display() {
        let err = Error::DuplicatePath {
            path: "a/b.txt".into(),
            first_index: 0,
            second_index: 2,
        };
        assert_eq!(
            err.to_string(),
            "Duplicate path 'a/b.txt' at entries 0 and 2"
        );
    }

    #[test]
    fn test_crc_mismatch_display() {
        let err = Error::CrcMismatch {
            entry_index: 1,
            entry_name: Some("meta.lsx".into()),
            expected: 0xdead,
            actual: 0xbeef,
        };
        assert_eq!(
            err.to_string(),
            "CRC mismatch for entry 1 (meta.lsx): expected 0xdead, got 0xbeef"
        );
    }

    #[test]
    fn test_classification() {
        let crc = Error::CrcMismatch {
            entry_index: 4,
            entry_name: None,
            expected: 1,
            actual: 2,
        };
        assert!(crc.is_corruption());
        assert!(!crc.is_input_error());
        assert_eq!(crc.entry_index(), Some(4));

        let dup = Error::DuplicatePath {
            path: "a".into(),
            first_index: 0,
            second_index: 3,
        };
        assert!(dup.is_input_error());
        assert_eq!(dup.entry_index(), Some(3));

        assert!(Error::corrupt(24, "x").is_corruption());
        assert_eq!(Error::InvalidFormat("x".into()).entry_index(), None);
    }

    #[test]
    fn test_io_from() {
        let err: Error = io::Error::other("disk full").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
