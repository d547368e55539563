//! Image decoding: container bytes to an in-memory [`RasterImage`].
//!
//! This module provides:
//! - The raster model shared by every operation (`RasterImage`, `Resolution`,
//!   `ContainerFormat`, metadata tags)
//! - Decoding of JPEG, PNG and BMP streams via the `image` crate
//! - Extraction of primary-image EXIF tags (TIFF, Exif, GPS and
//!   interoperability directories) via `kamadak-exif`
//!
//! Decoding never applies EXIF orientation; see [`crate::orientation`].

mod metadata;
mod raster;
mod types;

pub use metadata::read_metadata_tags;
pub use raster::decode_image;
pub use types::{
    resolution_from_tags, ContainerFormat, DecodeError, MetadataTags, PropertyItem, PropertyKind,
    RasterImage, Resolution, TagGroup, TagKey, RESOLUTION_UNIT_TAG, X_RESOLUTION_TAG,
    Y_RESOLUTION_TAG,
};
