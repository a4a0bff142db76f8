//! Fuzz target for parsing arbitrary bytes as a pak archive.
//!
//! Run with: cargo +nightly fuzz run pak_parse
//!
//! Parsing must never panic. Whatever parses must have entries that stay
//! inside the buffer and read back without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use modpak::{PakReader, ReadOptions};

fuzz_target!(|data: &[u8]| {
    let options = ReadOptions::new().max_entries(10_000).max_path_len(1024);
    let Ok(reader) = PakReader::parse_with(data, &options) else {
        return;
    };

    let data_offset = reader.header().data_offset();
    for (i, entry) in reader.entries().iter().enumerate() {
        assert!(data_offset + entry.end() <= data.len() as u64);
        let _ = reader.read_index(i);
        assert!(reader.find(entry.path.as_str()).is_some());
    }
    let _ = reader.verify();
});
