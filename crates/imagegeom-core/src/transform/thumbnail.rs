//! Fixed-size thumbnail generation.

use log::debug;

use super::resample::{resample, SourceRect};
use crate::decode::RasterImage;
use crate::error::{Error, Result};

/// Default thumbnail size (width, height) in pixels.
pub const THUMBNAIL_SIZE: (u32, u32) = (150, 200);

/// Stretch the whole image onto a `width x height` canvas.
///
/// Aspect ratio is not preserved. Resolution and container format carry
/// over; metadata tags do not.
///
/// # Errors
///
/// Returns `Error::InvalidDimensions` if either dimension is zero.
pub fn thumbnail(image: &RasterImage, width: u32, height: u32) -> Result<RasterImage> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }

    debug!(
        "Generating {}x{} thumbnail from {}x{} image",
        width,
        height,
        image.width(),
        image.height()
    );

    let rect = SourceRect::full(image.width(), image.height());
    let pixels = resample(image.pixels(), rect, width, height)?;
    Ok(RasterImage::new(pixels, image.format).with_resolution(image.resolution))
}
