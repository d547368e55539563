//! Resampling geometry operations: rectangular crops and thumbnails.
//!
//! Coordinates are in source pixels with the origin at the top-left corner,
//! x growing right and y growing down. Both operations stretch a source
//! rectangle onto a freshly allocated destination with bicubic filtering;
//! the source image is never modified.
//!
//! Parts of a destination whose sample point falls outside the source are
//! transparent black. Filter taps near the border are clamped to the edge.

mod crop;
mod resample;
mod thumbnail;

pub use crop::{crop_raster, CropRegion, CropUnit};
pub use thumbnail::{thumbnail, THUMBNAIL_SIZE};
