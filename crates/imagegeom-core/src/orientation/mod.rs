//! EXIF orientation handling.
//!
//! Cameras store pixels in sensor order and record how to display them in
//! the EXIF orientation tag (`0x0112`, values 1 to 8). Most encoders ignore
//! that tag, so images are normalized upright before any other geometric
//! operation such as cropping or thumbnailing.
//!
//! - [`resolve`] maps an orientation code to a [`TransformDescriptor`]
//! - [`normalize`] applies it to a [`RasterImage`](crate::decode::RasterImage)
//!   in place and optionally drops the now-redundant tag
//!
//! # Transform Order
//!
//! A descriptor is applied as a clockwise rotation followed by an optional
//! horizontal flip.

mod normalize;
mod resolve;

pub use normalize::{apply_transform, normalize, ORIENTATION_TAG};
pub use resolve::{resolve, Flip, Rotation, TransformDescriptor};
