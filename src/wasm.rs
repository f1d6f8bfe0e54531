//! WASM bindings for browser-based conversion.
//!
//! This module exposes the conversion entry point to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::convert::convert_docx_to_epub;
use crate::input::CoverAsset;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Convert a DOCX upload to EPUB.
///
/// `cover` and `cover_name` are the optional cover image and its file name;
/// the name decides the image type.
#[wasm_bindgen]
pub fn docx_to_epub(
    data: &[u8],
    file_name: &str,
    cover: Option<Vec<u8>>,
    cover_name: Option<String>,
) -> Result<Vec<u8>, JsValue> {
    let cover = match cover {
        Some(bytes) => Some(
            CoverAsset::new(cover_name.as_deref().unwrap_or("cover.jpg"), bytes)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
        ),
        None => None,
    };

    convert_docx_to_epub(data, file_name, cover.as_ref())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Name for the downloaded book: `{name without extension}.epub`.
#[wasm_bindgen]
pub fn epub_file_name(name: &str) -> String {
    crate::input::epub_file_name(name)
}
