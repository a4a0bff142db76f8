//! Options for parsing archives.

/// Options controlling how strictly an archive is parsed.
///
/// The defaults suit untrusted input: checksums are verified on every read
/// and the table size is bounded before anything is allocated for it.
///
/// # Example
///
/// ```rust
/// use modpak::ReadOptions;
///
/// let options = ReadOptions::new().verify_checksums(false).max_entries(100);
/// assert!(!options.verify_checksums);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Verify each payload's CRC-32 when it is read.
    pub verify_checksums: bool,
    /// Maximum number of entries accepted.
    pub max_entries: usize,
    /// Maximum path length accepted, in bytes.
    pub max_path_len: usize,
}

impl Default for ReadOptions {
    /// | Option | Default |
    /// |--------|---------|
    /// | `verify_checksums` | `true` |
    /// | `max_entries` | 1,000,000 |
    /// | `max_path_len` | 4096 |
    fn default() -> Self {
        Self {
            verify_checksums: true,
            max_entries: 1_000_000,
            max_path_len: 4096,
        }
    }
}

impl ReadOptions {
    /// Creates read options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether payload checksums are verified on read.
    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    /// Sets the maximum number of entries.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Sets the maximum path length in bytes.
    pub fn max_path_len(mut self, max: usize) -> Self {
        self.max_path_len = max;
        self
    }
}
