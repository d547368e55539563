//! WASM-compatible wrapper types and argument parsing.
//!
//! JavaScript passes units and formats as plain numbers and strings; the
//! helpers here map them onto the core enums.

use imagegeom_core::{ContainerFormat, CropUnit, Flip, NormalizedOutput, TransformDescriptor};
use wasm_bindgen::prelude::*;

/// Result of an orientation normalization.
///
/// `bytes` is only present when the image actually had to be rotated or
/// flipped; an upright image is never re-encoded.
#[wasm_bindgen]
#[derive(Debug)]
pub struct JsNormalized {
    descriptor: TransformDescriptor,
    encoded: Option<Vec<u8>>,
}

#[wasm_bindgen]
impl JsNormalized {
    /// Clockwise rotation that was applied, in degrees (0, 90, 180 or 270)
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> u16 {
        self.descriptor.rotation.degrees()
    }

    /// Whether a horizontal flip was applied after the rotation
    #[wasm_bindgen(getter)]
    pub fn flipped(&self) -> bool {
        self.descriptor.flip == Flip::Horizontal
    }

    /// True when the image was already upright
    #[wasm_bindgen(getter)]
    pub fn is_identity(&self) -> bool {
        self.descriptor.is_identity()
    }

    /// Re-encoded image as Uint8Array, or undefined when nothing changed.
    ///
    /// Note: This copies the encoded data into JavaScript memory.
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.encoded.clone()
    }

    /// The applied transform as a plain object, e.g.
    /// `{ rotation: "Clockwise90", flip: "None" }`.
    pub fn descriptor(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.descriptor)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl From<NormalizedOutput> for JsNormalized {
    fn from(output: NormalizedOutput) -> Self {
        Self {
            descriptor: output.descriptor,
            encoded: output.encoded,
        }
    }
}

/// Convert a u8 unit code to the core CropUnit enum.
///
/// Values follow the GDI+ `GraphicsUnit` numbering:
/// - 2 = Pixel
/// - 3 = Point (1/72 inch)
/// - 4 = Inch
/// - 5 = Document (1/300 inch)
/// - 6 = Millimeter
pub(crate) fn unit_from_u8(value: u8) -> Result<CropUnit, String> {
    CropUnit::from_code(value).ok_or_else(|| format!("Unknown crop unit code: {}", value))
}

/// Parse a target container name ("jpeg", "png", "bmp", or an extension).
pub(crate) fn format_from_str(value: &str) -> Result<ContainerFormat, String> {
    ContainerFormat::from_extension(value)
        .ok_or_else(|| format!("Unsupported target format: {}", value))
}
