//! WASM bindings for EXIF orientation handling.

use imagegeom_core::resolve;
use wasm_bindgen::prelude::*;

use crate::processor;
use crate::types::{format_from_str, JsNormalized};

/// Rotate/flip an encoded image upright according to its EXIF orientation.
///
/// # Arguments
///
/// * `bytes` - Encoded JPEG, PNG or BMP image
/// * `remove_tag` - Drop the orientation tag from the re-encoded image
/// * `format` - Target container ("jpeg", "png" or "bmp")
///
/// # Returns
///
/// A `JsNormalized` describing the applied transform. Its `bytes` are only
/// set when the image was not already upright.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const result = normalize_orientation(bytes, true, "jpeg");
/// const upright = result.bytes ?? bytes;
/// ```
#[wasm_bindgen]
pub fn normalize_orientation(
    bytes: &[u8],
    remove_tag: bool,
    format: &str,
) -> Result<JsNormalized, JsValue> {
    let format = format_from_str(format).map_err(|e| JsValue::from_str(&e))?;
    processor()
        .normalize_bytes(bytes, format, remove_tag)
        .map(JsNormalized::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resolve an EXIF orientation code (1 to 8) to a `{ rotation, flip }` object.
///
/// Unknown codes resolve to the identity.
#[wasm_bindgen]
pub fn resolve_orientation(code: u32) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&resolve(code)).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagegeom_core::decode::PropertyItem;
    use imagegeom_core::{
        decode_image, encode_image, ContainerFormat, EncodeOptions, RasterImage, ORIENTATION_TAG,
    };

    fn tagged_jpeg(width: u32, height: u32, orientation: u16) -> Vec<u8> {
        let rgba = [200u8, 30, 30, 255].repeat((width * height) as usize);
        let image = RasterImage::from_raw(width, height, rgba, ContainerFormat::Jpeg)
            .unwrap()
            .with_tag(ORIENTATION_TAG, PropertyItem::short(orientation));
        encode_image(&image, ContainerFormat::Jpeg, &EncodeOptions::default()).unwrap()
    }

    #[test]
    fn test_normalize_rotated_jpeg() {
        let result = normalize_orientation(&tagged_jpeg(16, 8, 6), true, "jpeg").unwrap();

        assert_eq!(result.rotation(), 90);
        assert!(!result.flipped());

        let upright = decode_image(&result.bytes().unwrap()).unwrap();
        assert_eq!(upright.dimensions(), (8, 16));
        assert!(upright.tag(ORIENTATION_TAG).is_none());
    }

    #[test]
    fn test_normalize_to_png() {
        let result = normalize_orientation(&tagged_jpeg(16, 8, 3), true, "png").unwrap();
        let upright = decode_image(&result.bytes().unwrap()).unwrap();

        assert_eq!(result.rotation(), 180);
        assert_eq!(upright.format, ContainerFormat::Png);
    }

    #[test]
    fn test_upright_image_is_not_reencoded() {
        let result = normalize_orientation(&tagged_jpeg(16, 8, 1), true, "jpeg").unwrap();

        assert!(result.is_identity());
        assert!(result.bytes().is_none());
    }
}
