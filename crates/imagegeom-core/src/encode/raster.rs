//! Encoding of a RasterImage into a container format.
//!
//! JPEG output drops the alpha channel and records the image resolution as
//! JFIF pixel density. PNG and BMP keep RGBA8.

use std::io::Cursor;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::{JpegEncoder, PixelDensity, PixelDensityUnit};
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::metadata::{embed_exif_segment, write_tiff_metadata};
use crate::decode::{ContainerFormat, RasterImage, Resolution};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// Serialized metadata does not fit in a single JPEG segment
    #[error("Metadata segment of {size} bytes exceeds the 65535 byte JPEG limit")]
    MetadataTooLarge { size: usize },

    /// Metadata tags could not be serialized
    #[error("Metadata serialization failed: {0}")]
    Metadata(String),
}

/// Options controlling how images are encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// JPEG quality (1 to 100)
    pub jpeg_quality: u8,
    /// Write metadata tags back into formats that carry EXIF (JPEG)
    pub preserve_metadata: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            preserve_metadata: true,
        }
    }
}

/// Encode an image in the given container format.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for an empty image, and
/// `EncodeError::EncodingFailed` if the underlying encoder fails.
pub fn encode_image(
    image: &RasterImage,
    format: ContainerFormat,
    options: &EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());

    match format {
        ContainerFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.pixels().clone()).into_rgb8();
            let mut encoder =
                JpegEncoder::new_with_quality(&mut buffer, options.jpeg_quality.clamp(1, 100));
            encoder.set_pixel_density(pixel_density(image.resolution));
            encoder
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        }
        ContainerFormat::Png => {
            PngEncoder::new(&mut buffer)
                .write_image(
                    image.pixels().as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        }
        ContainerFormat::Bmp => {
            BmpEncoder::new(&mut buffer)
                .write_image(
                    image.pixels().as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        }
    }

    let encoded = buffer.into_inner();

    if !options.preserve_metadata || image.tags.is_empty() {
        return Ok(encoded);
    }
    if format != ContainerFormat::Jpeg {
        warn!("{:?} output does not carry EXIF; metadata tags dropped", format);
        return Ok(encoded);
    }

    match write_tiff_metadata(&image.tags)? {
        Some(tiff) => {
            debug!("Embedding {} bytes of EXIF metadata", tiff.len());
            embed_exif_segment(&encoded, &tiff)
        }
        None => Ok(encoded),
    }
}

/// JFIF density for a DPI resolution, rounded and clamped to the field range.
fn pixel_density(resolution: Resolution) -> PixelDensity {
    let to_field = |dpi: f32| dpi.round().clamp(1.0, u16::MAX as f32) as u16;
    PixelDensity {
        density: (to_field(resolution.horizontal), to_field(resolution.vertical)),
        unit: PixelDensityUnit::Inches,
    }
}
