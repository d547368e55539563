//! Decoding of encoded container bytes into a RasterImage.

use std::io::Cursor;

use image::ImageReader;
use log::debug;

use super::metadata::read_metadata_tags;
use super::{resolution_from_tags, ContainerFormat, DecodeError, RasterImage};

/// Decode an encoded image (JPEG, PNG or BMP) into RGBA8 pixels plus metadata.
///
/// Pixels are returned in stored (sensor) orientation; EXIF orientation is
/// not applied here. The orientation tag, if any, is available in
/// [`RasterImage::tags`].
///
/// # Errors
///
/// Returns `DecodeError::UnsupportedFormat` if the container is not
/// recognized, and `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let image_format = reader
        .format()
        .ok_or_else(|| DecodeError::UnsupportedFormat("unrecognized container".to_string()))?;
    let format = ContainerFormat::from_image_format(image_format)
        .ok_or_else(|| DecodeError::UnsupportedFormat(format!("{:?}", image_format)))?;

    let decoded = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let tags = read_metadata_tags(bytes);
    let resolution = resolution_from_tags(&tags).unwrap_or_default();

    debug!(
        "Decoded {:?} image {}x{} with {} metadata tags",
        format,
        decoded.width(),
        decoded.height(),
        tags.len()
    );

    let mut image = RasterImage::new(decoded.into_rgba8(), format).with_resolution(resolution);
    image.tags = tags;
    Ok(image)
}
