//! Fuzz target for PakPath::new with arbitrary string input.
//!
//! Run with: cargo +nightly fuzz run pak_path
//!
//! Accepted paths must already be in normal form: relative, `/`-separated,
//! no `.`/`..`/empty segments, no characters Windows forbids in file names,
//! and stable under re-normalization.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(path) = modpak::PakPath::new(input) else {
        return;
    };
    let normalized = path.as_str();

    assert!(!normalized.is_empty());
    assert!(!normalized.starts_with('/'), "absolute: {:?}", normalized);
    assert!(!normalized.contains('\\'), "backslash: {:?}", normalized);
    assert!(!normalized.contains('\0'), "NUL: {:?}", normalized);
    for segment in normalized.split('/') {
        assert!(
            !segment.is_empty() && segment != "." && segment != "..",
            "bad segment {:?} in {:?}",
            segment,
            normalized
        );
        assert!(
            !segment.ends_with('.') && !segment.ends_with(' '),
            "trailing dot or space in {:?}",
            normalized
        );
        assert!(
            !segment
                .chars()
                .any(|c| c.is_ascii_control() || ":<>\"|?*".contains(c)),
            "forbidden character in {:?}",
            normalized
        );
    }

    let again = modpak::PakPath::new(normalized).expect("normal form must re-parse");
    assert_eq!(again.as_str(), normalized);
});
