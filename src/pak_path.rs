//! Normalized archive path type.
//!
//! Caller-supplied paths come from drag-and-drop lists, presets and
//! templates, so they arrive with mixed separators, leading slashes and
//! `.` segments. [`PakPath`] normalizes that noise away and rejects
//! anything that could not be stored safely.

use crate::format::MAX_PATH_BYTES;
use crate::{Error, Result};
use std::fmt;

/// Windows reserved device names that cannot be used as filenames.
///
/// The archive consumer runs on Windows, where these names refer to device
/// drivers. They are rejected on all platforms so a pak built anywhere
/// unpacks cleanly there.
const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Checks if a filename is a Windows reserved name.
///
/// Windows reserved names are case-insensitive and also reserved
/// when followed by an extension (e.g., "CON.txt" is reserved).
fn is_windows_reserved(name: &str) -> bool {
    let base = match name.find('.') {
        Some(pos) => &name[..pos],
        None => name,
    };

    WINDOWS_RESERVED_NAMES
        .iter()
        .any(|reserved| base.eq_ignore_ascii_case(reserved))
}

/// Characters Windows does not allow in a file name.
const FORBIDDEN_CHARS: &[char] = &[':', '<', '>', '"', '|', '?', '*'];

fn is_forbidden_char(c: char) -> bool {
    c.is_ascii_control() || FORBIDDEN_CHARS.contains(&c)
}

fn reject(path: &str, reason: impl Into<String>) -> Error {
    Error::InvalidPath {
        index: None,
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// A normalized, traversal-free relative path inside a pak.
///
/// Normalization:
/// - `\` separators become `/`
/// - leading `/` are stripped
/// - `.` segments are dropped
///
/// Rejected with [`Error::InvalidPath`]:
/// - NUL bytes and other ASCII control characters
/// - empty segments (`a//b`, trailing `/`)
/// - `..` segments
/// - characters Windows forbids in file names (`:`, `<`, `>`, `"`, `|`,
///   `?`, `*`), which also rules out drive prefixes and NTFS streams
/// - segments ending in `.` or a space
/// - Windows reserved device names
/// - paths with no segments left after normalization
///
/// Input longer than the table's path length field is rejected up front
/// with [`Error::EncodingOverflow`].
///
/// # Examples
///
/// ```
/// use modpak::PakPath;
///
/// let path = PakPath::new("/Mods/./MyMod\\meta.lsx").unwrap();
/// assert_eq!(path.as_str(), "Mods/MyMod/meta.lsx");
///
/// assert!(PakPath::new("../secret").is_err());
/// assert!(PakPath::new("a//b").is_err());
/// assert!(PakPath::new("C:/Windows/evil.dll").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PakPath(String);

impl PakPath {
    /// Normalizes and validates a path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] (without an entry index) if the path
    /// cannot be normalized.
    pub fn new(s: &str) -> Result<Self> {
        if s.contains('\0') {
            return Err(reject(s, "contains NUL byte"));
        }
        if s.is_empty() {
            return Err(reject(s, "empty path"));
        }
        if s.len() as u64 > MAX_PATH_BYTES {
            return Err(Error::EncodingOverflow {
                field: "path length",
                value: s.len() as u64,
                max: MAX_PATH_BYTES,
            });
        }

        let unified = s.replace('\\', "/");
        let relative = unified.trim_start_matches('/');
        if relative.is_empty() {
            return Err(reject(s, "path is empty after normalization"));
        }

        let mut segments = Vec::new();
        for segment in relative.split('/') {
            match segment {
                "." => continue,
                "" => {
                    return Err(reject(s, "empty segment (consecutive or trailing slash)"));
                }
                ".." => {
                    return Err(reject(s, "'..' segment not allowed (path traversal)"));
                }
                seg if seg.chars().any(is_forbidden_char) => {
                    let c = seg.chars().find(|&c| is_forbidden_char(c)).unwrap_or('?');
                    return Err(reject(
                        s,
                        format!("character '{}' not allowed in file names", c.escape_debug()),
                    ));
                }
                seg if seg.ends_with('.') || seg.ends_with(' ') => {
                    return Err(reject(
                        s,
                        format!("segment '{}' ends with a dot or space", seg),
                    ));
                }
                seg if is_windows_reserved(seg) => {
                    return Err(reject(
                        s,
                        format!("Windows reserved filename '{}' not allowed", seg),
                    ));
                }
                seg => segments.push(seg),
            }
        }

        if segments.is_empty() {
            return Err(reject(s, "path is empty after normalization"));
        }

        Ok(Self(segments.join("/")))
    }

    /// Returns the path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the path and returns the normalized string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the parent directory of this path, if any.
    pub fn parent(&self) -> Option<Self> {
        self.0.rfind('/').map(|idx| Self(self.0[..idx].to_string()))
    }

    /// Returns the file name (last segment) of this path.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns an iterator over the path segments.
    ///
    /// ```
    /// use modpak::PakPath;
    ///
    /// let path = PakPath::new("Mods/MyMod/meta.lsx").unwrap();
    /// let segments: Vec<_> = path.components().collect();
    /// assert_eq!(segments, vec!["Mods", "MyMod", "meta.lsx"]);
    /// ```
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl AsRef<str> for PakPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PakPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for PakPath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for PakPath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn reason(s: &str) -> String {
        match PakPath::new(s).unwrap_err() {
            Error::InvalidPath { index, reason, .. } => {
                assert_eq!(index, None);
                reason
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_valid_simple_file() {
        let path = PakPath::new("meta.txt").unwrap();
        assert_eq!(path.as_str(), "meta.txt");
    }

    #[test]
    fn test_valid_nested_path() {
        let path = PakPath::new("Mods/MyMod/meta.lsx").unwrap();
        assert_eq!(path.as_str(), "Mods/MyMod/meta.lsx");
    }

    #[test]
    fn test_valid_unicode() {
        let path = PakPath::new("日本語/файл.txt").unwrap();
        assert_eq!(path.as_str(), "日本語/файл.txt");
    }

    #[test]
    fn test_strips_leading_slashes() {
        assert_eq!(PakPath::new("/a/b").unwrap().as_str(), "a/b");
        assert_eq!(PakPath::new("///a").unwrap().as_str(), "a");
    }

    #[test]
    fn test_collapses_dot_segments() {
        assert_eq!(PakPath::new("./a/./b/.").unwrap().as_str(), "a/b");
    }

    #[test]
    fn test_backslashes_become_slashes() {
        assert_eq!(
            PakPath::new("Public\\MyMod\\preset.json").unwrap().as_str(),
            "Public/MyMod/preset.json"
        );
    }

    #[test]
    fn test_dotted_names_are_not_dot_segments() {
        assert_eq!(PakPath::new(".hidden").unwrap().as_str(), ".hidden");
        assert_eq!(PakPath::new("a/..b/c...d").unwrap().as_str(), "a/..b/c...d");
    }

    #[test]
    fn test_invalid_empty() {
        assert_eq!(reason(""), "empty path");
    }

    #[test]
    fn test_invalid_only_slashes_and_dots() {
        assert!(reason("/").contains("empty after normalization"));
        assert!(reason("./.").contains("empty after normalization"));
    }

    #[test]
    fn test_invalid_nul_byte() {
        assert!(reason("file\0.txt").contains("NUL"));
    }

    #[test]
    fn test_invalid_traversal() {
        assert!(reason("../secret").contains("traversal"));
        assert!(reason("a/../b").contains("traversal"));
        assert!(reason("a\\..\\b").contains("traversal"));
    }

    #[test]
    fn test_invalid_empty_segment() {
        assert!(reason("a//b").contains("empty segment"));
        assert!(reason("a/b/").contains("empty segment"));
    }

    #[test]
    fn test_invalid_windows_reserved() {
        assert!(reason("CON").contains("reserved"));
        assert!(reason("dir/nul.txt").contains("reserved"));
        assert!(PakPath::new("console.txt").is_ok());
    }

    #[test]
    fn test_invalid_drive_prefix() {
        assert!(reason("C:").contains("':'"));
        assert!(reason("C:/Windows/System32/evil.dll").contains("':'"));
        assert!(reason("\\C:\\evil.dll").contains("':'"));
    }

    #[test]
    fn test_invalid_alternate_data_stream() {
        assert!(reason("Mods/meta.lsx:hidden").contains("':'"));
    }

    #[test]
    fn test_invalid_windows_characters() {
        for bad in ["a/b<c.txt", "a/b>c", "a/\"q\"", "a|b", "what?", "glob*.txt"] {
            assert!(reason(bad).contains("not allowed"), "{:?}", bad);
        }
        assert!(reason("tab\there").contains("not allowed"));
        assert!(reason("bell\u{7}").contains("not allowed"));
    }

    #[test]
    fn test_invalid_trailing_dot_or_space() {
        assert!(reason("a/meta.lsx.").contains("dot or space"));
        assert!(reason("a/meta.lsx ").contains("dot or space"));
        assert!(reason("dir./x").contains("dot or space"));
        assert!(PakPath::new("a/ leading space").is_ok());
    }

    #[test]
    fn test_length_capped_before_splitting() {
        let long = "a/".repeat(MAX_PATH_BYTES as usize / 2) + "bc";
        assert!(matches!(
            PakPath::new(&long),
            Err(Error::EncodingOverflow { field: "path length", .. })
        ));
        let longest = "a".repeat(MAX_PATH_BYTES as usize);
        assert_eq!(PakPath::new(&longest).unwrap().as_str().len(), longest.len());
    }

    #[test]
    fn test_error_keeps_raw_path() {
        match PakPath::new("x/../y").unwrap_err() {
            Error::InvalidPath { path, .. } => assert_eq!(path, "x/../y"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parent() {
        let path = PakPath::new("a/b/c.txt").unwrap();
        assert_eq!(path.parent().unwrap().as_str(), "a/b");
        assert!(PakPath::new("c.txt").unwrap().parent().is_none());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(PakPath::new("a/b/c.txt").unwrap().file_name(), "c.txt");
        assert_eq!(PakPath::new("c.txt").unwrap().file_name(), "c.txt");
    }

    #[test]
    fn test_try_from() {
        let path: PakPath = "\\a\\b".try_into().unwrap();
        assert_eq!(path.as_str(), "a/b");
        let path: PakPath = String::from("a/./b").try_into().unwrap();
        assert_eq!(path.into_string(), "a/b");
    }

    #[test]
    fn test_equivalent_inputs_hash_equal() {
        let mut set = HashSet::new();
        set.insert(PakPath::new("a/b").unwrap());
        set.insert(PakPath::new("/a/./b").unwrap());
        set.insert(PakPath::new("a\\b").unwrap());
        assert_eq!(set.len(), 1);
    }
}
