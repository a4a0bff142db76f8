//! WASM/Browser support for modpak
//!
//! Exposes the builder to JavaScript so a web front end can pack files
//! in-process. On the Rust side the builder is an ordinary owned value;
//! JavaScript callers may still call `free()` early, but dropping the
//! handle is enough.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import { ModFile, PakBuilder, init_panic_hook } from 'modpak';
//!
//! init_panic_hook();
//! const builder = new PakBuilder([new ModFile('Mods/MyMod/meta.lsx', metaBytes)]);
//! builder.addText('Mods/MyMod/preset.json', JSON.stringify(preset));
//! const pak = builder.pack();
//! ```

mod builder;

pub use builder::{ModFile, WasmPakBuilder};

use wasm_bindgen::prelude::*;

/// Install a panic hook.
///
/// Kept for callers that invoke it before building. Currently a no-op:
/// panics surface as the default `unreachable` trap.
#[wasm_bindgen]
pub fn init_panic_hook() {}

/// Get the library version
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Format version written by `PakBuilder.pack()`
#[wasm_bindgen(js_name = "getFormatVersion")]
pub fn get_format_version() -> u32 {
    crate::format::VERSION
}
