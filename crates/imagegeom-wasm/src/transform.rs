//! WASM bindings for crop and thumbnail operations.
//!
//! Both take an encoded image and return the result encoded in the same
//! container format. Failures are written to the browser console once and
//! then thrown as a JavaScript error string.

use imagegeom_core::CropRegion;
use wasm_bindgen::prelude::*;

use crate::processor;
use crate::types::unit_from_u8;

/// Crop a rectangle out of an encoded image.
///
/// # Arguments
///
/// * `bytes` - Encoded JPEG, PNG or BMP image
/// * `x`, `y` - Top-left corner of the region
/// * `width`, `height` - Region size; the output is `ceil(width) x ceil(height)` pixels
/// * `unit` - Unit code of the region (2 = pixel, 3 = point, 4 = inch,
///   5 = document, 6 = millimeter)
///
/// # Example (TypeScript)
///
/// ```typescript
/// const cropped = crop(bytes, 0, 0, 500, 500, 2);
/// ```
#[wasm_bindgen]
pub fn crop(
    bytes: &[u8],
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    unit: u8,
) -> Result<Vec<u8>, JsValue> {
    let unit = unit_from_u8(unit).map_err(|e| JsValue::from_str(&e))?;
    processor()
        .crop(bytes, CropRegion::new(x, y, width, height), unit)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Normalize orientation and stretch an encoded image to `width x height`.
///
/// Aspect ratio is not preserved. Pass 150 x 200 for the standard thumbnail.
#[wasm_bindgen]
pub fn thumbnail(bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    processor()
        .thumbnail_bytes(bytes, width, height)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagegeom_core::{decode_image, encode_image, ContainerFormat, EncodeOptions, RasterImage};

    /// Encode a solid-color PNG test image.
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let rgba = [40u8, 80, 120, 255].repeat((width * height) as usize);
        let image = RasterImage::from_raw(width, height, rgba, ContainerFormat::Png).unwrap();
        encode_image(&image, ContainerFormat::Png, &EncodeOptions::default()).unwrap()
    }

    #[test]
    fn test_crop_pixels() {
        let out = crop(&png_bytes(100, 100), 10.0, 10.0, 40.0, 20.5, 2).unwrap();
        let decoded = decode_image(&out).unwrap();

        assert_eq!(decoded.format, ContainerFormat::Png);
        assert_eq!(decoded.dimensions(), (40, 21));
    }

    #[test]
    fn test_crop_inches() {
        // No resolution metadata: 96 DPI, so half an inch is 48 source pixels
        let out = crop(&png_bytes(100, 100), 0.0, 0.0, 0.5, 0.5, 4).unwrap();
        assert_eq!(decode_image(&out).unwrap().dimensions(), (1, 1));
    }

    #[test]
    fn test_thumbnail() {
        let out = thumbnail(&png_bytes(300, 300), 150, 200).unwrap();
        assert_eq!(decode_image(&out).unwrap().dimensions(), (150, 200));
    }
}

/// WASM-specific tests that require JsValue.
///
/// Error paths build a `JsValue` and write to the console, so they can only
/// run on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_crop_rejects_garbage() {
        let err = crop(b"garbage", 0.0, 0.0, 10.0, 10.0, 2).unwrap_err();
        assert!(err.as_string().is_some());
    }

    #[wasm_bindgen_test]
    fn test_crop_rejects_unknown_unit() {
        let err = crop(b"garbage", 0.0, 0.0, 10.0, 10.0, 9).unwrap_err();
        assert_eq!(err.as_string().unwrap(), "Unknown crop unit code: 9");
    }

    #[wasm_bindgen_test]
    fn test_thumbnail_rejects_zero_size() {
        assert!(thumbnail(b"garbage", 0, 0).is_err());
    }
}
