//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use modpak::format::{HEADER_SIZE, record_size};
use modpak::{Archive, PakBuilder, PakOptions, PakReader, VirtualFile};

/// Builds an archive from (path, data) pairs with optional options.
pub fn build_archive_with(
    options: Option<PakOptions>,
    entries: &[(&str, &[u8])],
) -> modpak::Result<Archive> {
    let files: Vec<VirtualFile<'_>> = entries
        .iter()
        .map(|(path, data)| VirtualFile::new(*path, *data))
        .collect();

    let builder = match options {
        Some(opts) => PakBuilder::new().options(opts),
        None => PakBuilder::new(),
    };
    builder.build(&files)
}

/// Builds an archive with default options, panicking on failure.
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build_archive_with(None, entries)
        .expect("failed to build archive")
        .into_bytes()
}

/// Parses `bytes` and checks that every entry reads back as `expected`,
/// in the same order.
pub fn verify_archive_contents(bytes: &[u8], expected: &[(&str, &[u8])]) {
    let reader = PakReader::parse(bytes).expect("failed to parse archive");
    reader.verify().expect("checksum verification failed");
    assert_eq!(reader.len(), expected.len(), "entry count mismatch");

    for (i, ((entry, payload), (name, data))) in reader.iter().zip(expected).enumerate() {
        assert_eq!(entry.path.as_str(), *name, "path mismatch at entry {}", i);
        assert_eq!(payload, *data, "content mismatch for {}", name);
    }
}

/// Returns the expected table size for the given normalized paths.
pub fn table_size(paths: &[&str]) -> u64 {
    paths.iter().map(|p| record_size(p.len())).sum()
}

/// Returns the absolute offset of the data region for the given paths.
pub fn data_offset(paths: &[&str]) -> u64 {
    HEADER_SIZE + table_size(paths)
}

/// Overwrites a little-endian u32 at `pos`.
pub fn patch_u32(bytes: &mut [u8], pos: usize, value: u32) {
    bytes[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
}

/// Overwrites a little-endian u64 at `pos`.
pub fn patch_u64(bytes: &mut [u8], pos: usize, value: u64) {
    bytes[pos..pos + 8].copy_from_slice(&value.to_le_bytes());
}
