//! Build options for pak creation.

use std::borrow::Cow;

/// How paths are compared when looking for duplicates.
///
/// Stored names always keep the case they were given; this only decides
/// whether `Data/A.txt` and `data/a.txt` count as the same entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathCase {
    /// Paths differing only in case are distinct entries.
    #[default]
    Sensitive,
    /// Paths differing only in case collide.
    ///
    /// Use this when the consumer unpacks onto a case-insensitive
    /// filesystem.
    Insensitive,
}

impl PathCase {
    /// Returns the key used for duplicate detection.
    pub(crate) fn key<'a>(&self, path: &'a str) -> Cow<'a, str> {
        match self {
            Self::Sensitive => Cow::Borrowed(path),
            Self::Insensitive => Cow::Owned(path.to_lowercase()),
        }
    }
}

/// Options for building archives.
///
/// # Example
///
/// ```rust
/// use modpak::{PakOptions, PathCase};
///
/// let options = PakOptions::new()
///     .path_case(PathCase::Insensitive)
///     .max_entries(1024)
///     .max_total_size(64 * 1024 * 1024);
/// assert_eq!(options.max_entries, Some(1024));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PakOptions {
    /// Duplicate detection policy.
    pub path_case: PathCase,
    /// Maximum number of entries, if limited.
    pub max_entries: Option<usize>,
    /// Maximum total payload size in bytes, if limited.
    pub max_total_size: Option<u64>,
}

impl PakOptions {
    /// Creates new build options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duplicate detection policy.
    pub fn path_case(mut self, path_case: PathCase) -> Self {
        self.path_case = path_case;
        self
    }

    /// Caps the number of entries a build accepts.
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Caps the total payload bytes a build accepts.
    pub fn max_total_size(mut self, max: u64) -> Self {
        self.max_total_size = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PakOptions::new();
        assert_eq!(options.path_case, PathCase::Sensitive);
        assert_eq!(options.max_entries, None);
        assert_eq!(options.max_total_size, None);
    }

    #[test]
    fn test_builder_chain() {
        let options = PakOptions::new()
            .path_case(PathCase::Insensitive)
            .max_entries(3)
            .max_total_size(10);
        assert_eq!(options.path_case, PathCase::Insensitive);
        assert_eq!(options.max_entries, Some(3));
        assert_eq!(options.max_total_size, Some(10));
    }

    #[test]
    fn test_case_keys() {
        assert_eq!(PathCase::Sensitive.key("Data/A.txt"), "Data/A.txt");
        assert_eq!(PathCase::Insensitive.key("Data/A.txt"), "data/a.txt");
        assert!(matches!(PathCase::Sensitive.key("x"), Cow::Borrowed(_)));
    }
}
