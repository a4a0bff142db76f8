//! # modpak
//!
//! Deterministic single-file `.pak` archive builder for game mod packaging.
//!
//! A mod generator collects a handful of in-memory files (a `meta.lsx`
//! descriptor, a preset JSON, assets) and needs them in one archive that an
//! external, unmodifiable tool reads byte for byte. This crate does exactly
//! that step: normalize paths, lay out a header, a file table and a data
//! region, and return the bytes. It performs no I/O of its own.
//!
//! ## Quick Start
//!
//! ### Building an Archive
//!
//! ```rust
//! use modpak::{VirtualFile, Result};
//!
//! fn main() -> Result<()> {
//!     let files = vec![
//!         VirtualFile::text("Mods/MyPreset/meta.lsx", "<save/>"),
//!         VirtualFile::new("Mods/MyPreset/preset.json", br#"{"Name":"x"}"#.to_vec()),
//!     ];
//!
//!     let archive = modpak::build(&files)?;
//!     println!("{} entries, {} bytes", archive.entry_count(), archive.len());
//!     Ok(())
//! }
//! ```
//!
//! ### Reading an Archive Back
//!
//! ```rust
//! use modpak::{PakReader, VirtualFile, Result};
//!
//! fn main() -> Result<()> {
//!     let archive = modpak::build(&[VirtualFile::text("meta.txt", "hello")])?;
//!
//!     let reader = PakReader::parse(archive.as_bytes())?;
//!     for (entry, data) in reader.iter() {
//!         println!("{}: {} bytes at {}", entry.path, data.len(), entry.offset);
//!     }
//!     reader.verify()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Deterministic**: the same ordered input always yields the same bytes.
//! - **All or nothing**: every validation runs before output is produced.
//! - **Stateless**: builds share nothing and may run concurrently.
//!
//! See [`format`] for the exact binary layout.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `cli` | The `modpak` command-line tool |
//! | `wasm` | JavaScript bindings via wasm-bindgen |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod format;
pub mod pak_path;
pub mod read;
pub mod write;

#[cfg(feature = "wasm")]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm")))]
pub mod wasm;

pub use error::{Error, Result};
pub use format::header::PakHeader;
pub use format::table::FileTableEntry;
pub use pak_path::PakPath;
pub use read::{PakReader, ReadOptions};
pub use write::{Archive, PakBuilder, PakOptions, PathCase, VirtualFile, build};
