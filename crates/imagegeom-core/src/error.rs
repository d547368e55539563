//! Crate-level error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Errors returned by crop, thumbnail and file-based orientation operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The source stream could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The result could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Reading the source or writing the target file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The crop region is not finite, negative, or has no area.
    #[error("Invalid crop region: {0}")]
    InvalidRegion(String),

    /// Requested output dimensions are zero.
    #[error("Invalid output dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The destination buffer could not be allocated.
    #[error("Cannot allocate a {width}x{height} destination buffer")]
    Allocation { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
