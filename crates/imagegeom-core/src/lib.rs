//! Imagegeom Core - Geometric image operations
//!
//! This crate provides EXIF orientation normalization, rectangular cropping
//! with bicubic resampling, and thumbnail generation over an in-memory RGBA
//! raster, together with the JPEG/PNG/BMP codecs that feed it.

pub mod decode;
pub mod encode;
pub mod error;
pub mod orientation;
pub mod processor;
pub mod sink;
pub mod transform;

pub use decode::{decode_image, ContainerFormat, RasterImage, Resolution, TagGroup, TagKey};
pub use encode::{encode_image, EncodeOptions};
pub use error::{Error, Result};
pub use orientation::{normalize, resolve, Flip, Rotation, TransformDescriptor, ORIENTATION_TAG};
pub use processor::{ImageProcessor, NormalizedOutput};
pub use sink::{LogFacadeSink, LogSink, NoopSink};
pub use transform::{crop_raster, thumbnail, CropRegion, CropUnit, THUMBNAIL_SIZE};
