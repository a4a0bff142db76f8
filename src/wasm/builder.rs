//! JavaScript-exposed builder API for WASM.

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;

use crate::write::{Archive, PakBuilder, PakOptions, PathCase, VirtualFile};

/// A file queued for packing.
///
/// # JavaScript Example
///
/// ```javascript
/// const file = new ModFile('Mods/MyMod/meta.lsx', new TextEncoder().encode(xml));
/// console.log(file.path, file.size);
/// ```
#[wasm_bindgen]
pub struct ModFile {
    path: String,
    content: Vec<u8>,
}

#[wasm_bindgen]
impl ModFile {
    /// Create a file from a path and its bytes.
    #[wasm_bindgen(constructor)]
    pub fn new(path: String, content: &[u8]) -> Self {
        Self {
            path,
            content: content.to_vec(),
        }
    }

    /// Path as supplied (normalized when packed).
    #[wasm_bindgen(getter)]
    pub fn path(&self) -> String {
        self.path.clone()
    }

    /// Content length in bytes.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// A pak builder exposed to JavaScript.
///
/// Files passed to the constructor come first, followed by any added
/// later, in call order. The builder can be packed repeatedly; each call
/// produces a fresh archive.
///
/// # JavaScript Example
///
/// ```javascript
/// const files = [new ModFile('Mods/MyMod/meta.lsx', metaBytes)];
/// const builder = new PakBuilder(files);
/// builder.addText('Mods/MyMod/preset.json', '{}');
/// const pak = builder.pack();
/// ```
#[wasm_bindgen(js_name = "PakBuilder")]
pub struct WasmPakBuilder {
    files: Vec<ModFile>,
    case_insensitive: bool,
}

impl Default for WasmPakBuilder {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[wasm_bindgen(js_class = "PakBuilder")]
impl WasmPakBuilder {
    /// Create a builder from an array of `ModFile`s.
    ///
    /// The JavaScript handles are consumed. Pass `[]` to start empty and
    /// use `addFile` instead.
    #[wasm_bindgen(constructor)]
    pub fn new(files: Vec<ModFile>) -> Self {
        Self {
            files,
            case_insensitive: false,
        }
    }

    /// Queue a `ModFile`. The JavaScript handle is consumed.
    #[wasm_bindgen(js_name = "addFile")]
    pub fn add_file(&mut self, file: ModFile) {
        self.files.push(file);
    }

    /// Queue a file from raw bytes.
    #[wasm_bindgen(js_name = "addBytes")]
    pub fn add_bytes(&mut self, path: String, content: &[u8]) {
        self.files.push(ModFile::new(path, content));
    }

    /// Queue a file from a string, encoded as UTF-8.
    #[wasm_bindgen(js_name = "addText")]
    pub fn add_text(&mut self, path: String, text: &str) {
        self.files.push(ModFile::new(path, text.as_bytes()));
    }

    /// Treat paths differing only in case as duplicates.
    #[wasm_bindgen(js_name = "setCaseInsensitive")]
    pub fn set_case_insensitive(&mut self, value: bool) {
        self.case_insensitive = value;
    }

    /// Number of queued files.
    #[wasm_bindgen(getter, js_name = "fileCount")]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Pack the queued files.
    ///
    /// @returns The archive as a Uint8Array
    /// @throws Error with the validation message on invalid or duplicate paths
    pub fn pack(&self) -> Result<Uint8Array, JsValue> {
        let archive = self
            .build()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Uint8Array::from(archive.as_bytes()))
    }
}

impl WasmPakBuilder {
    fn build(&self) -> crate::Result<Archive> {
        let path_case = if self.case_insensitive {
            PathCase::Insensitive
        } else {
            PathCase::Sensitive
        };

        let files: Vec<VirtualFile<'_>> = self
            .files
            .iter()
            .map(|f| VirtualFile::new(f.path.as_str(), f.content.as_slice()))
            .collect();

        PakBuilder::new()
            .options(PakOptions::new().path_case(path_case))
            .build(&files)
    }
}
