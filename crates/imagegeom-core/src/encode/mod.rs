//! Image encoding: [`RasterImage`](crate::decode::RasterImage) to container bytes.
//!
//! This module provides:
//! - Encoding to JPEG (configurable quality), PNG and BMP
//! - Re-embedding metadata tags as an EXIF segment in JPEG output
//!
//! # Examples
//!
//! ```ignore
//! use imagegeom_core::decode::ContainerFormat;
//! use imagegeom_core::encode::{encode_image, EncodeOptions};
//!
//! let bytes = encode_image(&image, ContainerFormat::Png, &EncodeOptions::default())?;
//! ```

mod metadata;
mod raster;

pub use metadata::{embed_exif_segment, write_tiff_metadata};
pub use raster::{encode_image, EncodeError, EncodeOptions};
