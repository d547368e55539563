//! High-level entry points combining decode, geometry and encode.
//!
//! [`ImageProcessor`] is the surface hosts call into. It holds no state
//! besides its [`LogSink`] and [`EncodeOptions`], so a single instance can be
//! shared across threads when the sink allows it.
//!
//! # Error Reporting
//!
//! Every fallible public operation reports its failure to the sink exactly
//! once, with a short context message and the error as cause, and then
//! returns the same error to the caller.
//!
//! # Examples
//!
//! ```ignore
//! use imagegeom_core::{CropRegion, CropUnit, ImageProcessor, LogFacadeSink};
//!
//! let processor = ImageProcessor::new().with_sink(LogFacadeSink);
//! let cropped = processor.crop(&bytes, CropRegion::new(0.0, 0.0, 500.0, 500.0), CropUnit::Pixel)?;
//! ```

use std::fs;
use std::path::Path;

use log::debug;

use crate::decode::{decode_image, ContainerFormat, RasterImage};
use crate::encode::{encode_image, EncodeOptions};
use crate::error::{Error, Result};
use crate::orientation::{self, TransformDescriptor};
use crate::sink::{LogSink, NoopSink};
use crate::transform::{self, crop_raster, CropRegion, CropUnit, THUMBNAIL_SIZE};

/// Result of normalizing an encoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOutput {
    /// Transform that was applied.
    pub descriptor: TransformDescriptor,
    /// Re-encoded image, present only when the transform was not the identity.
    pub encoded: Option<Vec<u8>>,
}

/// Stateless image processor reporting failures to a [`LogSink`].
#[derive(Debug, Clone, Default)]
pub struct ImageProcessor<S = NoopSink> {
    sink: S,
    options: EncodeOptions,
}

impl ImageProcessor<NoopSink> {
    /// Create a processor with default encode options and no error sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: LogSink> ImageProcessor<S> {
    /// Replace the error sink.
    pub fn with_sink<T: LogSink>(self, sink: T) -> ImageProcessor<T> {
        ImageProcessor {
            sink,
            options: self.options,
        }
    }

    /// Replace the encode options.
    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Crop an encoded image and re-encode it in its source container format.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Encoded JPEG, PNG or BMP stream
    /// * `region` - Area to cut out, in `unit`
    /// * `unit` - Unit of `region`; physical units use the source resolution
    ///
    /// # Returns
    ///
    /// The encoded `ceil(width) x ceil(height)` crop.
    ///
    /// # Errors
    ///
    /// Decode, region validation, allocation and encode failures are
    /// reported to the sink and returned.
    pub fn crop(&self, bytes: &[u8], region: CropRegion, unit: CropUnit) -> Result<Vec<u8>> {
        decode_image(bytes)
            .map_err(Error::from)
            .and_then(|image| self.crop_encoded(&image, region, unit))
            .map_err(|e| self.report("Failed to crop image", e))
    }

    /// Crop an already decoded image and encode it in its container format.
    pub fn crop_image(
        &self,
        image: &RasterImage,
        region: CropRegion,
        unit: CropUnit,
    ) -> Result<Vec<u8>> {
        self.crop_encoded(image, region, unit)
            .map_err(|e| self.report("Failed to crop image", e))
    }

    /// Rotate/flip `image` upright according to its orientation tag.
    ///
    /// See [`orientation::normalize`]. This never fails.
    pub fn normalize(&self, image: &mut RasterImage, remove_tag: bool) -> TransformDescriptor {
        orientation::normalize(image, remove_tag)
    }

    /// Normalize an encoded image, re-encoding it only if pixels changed.
    pub fn normalize_bytes(
        &self,
        bytes: &[u8],
        target_format: ContainerFormat,
        remove_tag: bool,
    ) -> Result<NormalizedOutput> {
        self.normalize_encoded(bytes, target_format, remove_tag)
            .map_err(|e| self.report("Failed to normalize orientation", e))
    }

    /// Normalize the image at `source` and write it to `target`.
    ///
    /// The target file is written only when the resolved transform is not
    /// the identity; otherwise the file system is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the source cannot be read or the target
    /// cannot be written, plus any decode or encode failure.
    pub fn normalize_file(
        &self,
        source: impl AsRef<Path>,
        target: impl AsRef<Path>,
        target_format: ContainerFormat,
        remove_tag: bool,
    ) -> Result<TransformDescriptor> {
        let (source, target) = (source.as_ref(), target.as_ref());
        self.normalize_path(source, target, target_format, remove_tag)
            .map_err(|e| self.report("Failed to normalize orientation", e))
    }

    /// Normalize `image` (dropping its orientation tag) and stretch it to
    /// [`THUMBNAIL_SIZE`].
    pub fn thumbnail(&self, image: &mut RasterImage) -> Result<RasterImage> {
        let (width, height) = THUMBNAIL_SIZE;
        self.thumbnail_sized(image, width, height)
    }

    /// Normalize `image` (dropping its orientation tag) and stretch it to
    /// `width x height`.
    pub fn thumbnail_sized(
        &self,
        image: &mut RasterImage,
        width: u32,
        height: u32,
    ) -> Result<RasterImage> {
        // Reject before touching the caller's image
        non_empty(width, height)
            .and_then(|()| {
                orientation::normalize(image, true);
                transform::thumbnail(image, width, height)
            })
            .map_err(|e| self.report("Failed to generate thumbnail", e))
    }

    /// Decode, normalize, thumbnail and re-encode in the source format.
    pub fn thumbnail_bytes(&self, bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        self.thumbnail_encoded(bytes, width, height)
            .map_err(|e| self.report("Failed to generate thumbnail", e))
    }

    fn report(&self, message: &str, error: Error) -> Error {
        self.sink.error(message, &error);
        error
    }

    fn crop_encoded(
        &self,
        image: &RasterImage,
        region: CropRegion,
        unit: CropUnit,
    ) -> Result<Vec<u8>> {
        let cropped = crop_raster(image, region, unit)?;
        Ok(encode_image(&cropped, cropped.format, &self.options)?)
    }

    fn normalize_encoded(
        &self,
        bytes: &[u8],
        target_format: ContainerFormat,
        remove_tag: bool,
    ) -> Result<NormalizedOutput> {
        let mut image = decode_image(bytes)?;
        let descriptor = orientation::normalize(&mut image, remove_tag);
        let encoded = if descriptor.is_identity() {
            None
        } else {
            Some(encode_image(&image, target_format, &self.options)?)
        };
        Ok(NormalizedOutput {
            descriptor,
            encoded,
        })
    }

    fn normalize_path(
        &self,
        source: &Path,
        target: &Path,
        target_format: ContainerFormat,
        remove_tag: bool,
    ) -> Result<TransformDescriptor> {
        let bytes = fs::read(source).map_err(|source_err| Error::Io {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        let output = self.normalize_encoded(&bytes, target_format, remove_tag)?;
        if let Some(encoded) = output.encoded {
            fs::write(target, encoded).map_err(|e| Error::Io {
                path: target.to_path_buf(),
                source: e,
            })?;
            debug!("Wrote normalized image to {}", target.display());
        }
        Ok(output.descriptor)
    }

    fn thumbnail_encoded(&self, bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        non_empty(width, height)?;
        let mut image = decode_image(bytes)?;
        orientation::normalize(&mut image, true);
        let thumb = transform::thumbnail(&image, width, height)?;
        Ok(encode_image(&thumb, thumb.format, &self.options)?)
    }
}

fn non_empty(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    Ok(())
}
