//! Imagegeom WASM - WebAssembly bindings for imagegeom
//!
//! This crate exposes the imagegeom-core crop, thumbnail and orientation
//! operations to JavaScript/TypeScript applications. Images cross the
//! boundary as encoded bytes (`Uint8Array`).
//!
//! # Module Structure
//!
//! - `orientation` - EXIF orientation resolution and normalization
//! - `transform` - Rectangular crop and thumbnail generation
//! - `types` - WASM-compatible wrapper types
//! - `sink` - Error reporting to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { crop, normalize_orientation } from '@imagegeom/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const upright = normalize_orientation(bytes, true, "jpeg").bytes ?? bytes;
//! const cropped = crop(upright, 0, 0, 500, 500, 2);
//! ```

use imagegeom_core::ImageProcessor;
use wasm_bindgen::prelude::*;

mod orientation;
mod sink;
mod transform;
mod types;

// Re-export public types
pub use orientation::{normalize_orientation, resolve_orientation};
pub use sink::ConsoleSink;
pub use transform::{crop, thumbnail};
pub use types::JsNormalized;

/// Processor used by every binding; failures go to the browser console.
pub(crate) fn processor() -> ImageProcessor<ConsoleSink> {
    ImageProcessor::new().with_sink(ConsoleSink)
}

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }
}
