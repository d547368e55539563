//! Core types for the in-memory raster model.

use std::collections::BTreeMap;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// TIFF tag holding the horizontal resolution (RATIONAL).
pub const X_RESOLUTION_TAG: u16 = 0x011A;
/// TIFF tag holding the vertical resolution (RATIONAL).
pub const Y_RESOLUTION_TAG: u16 = 0x011B;
/// TIFF tag holding the resolution unit (SHORT, 2 = inch, 3 = centimetre).
pub const RESOLUTION_UNIT_TAG: u16 = 0x0128;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The container format is not recognized or not supported.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The image stream is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Container format an image was decoded from, or should be encoded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContainerFormat {
    #[default]
    Jpeg,
    Png,
    Bmp,
}

impl ContainerFormat {
    /// Convert to the image crate's ImageFormat.
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            ContainerFormat::Jpeg => image::ImageFormat::Jpeg,
            ContainerFormat::Png => image::ImageFormat::Png,
            ContainerFormat::Bmp => image::ImageFormat::Bmp,
        }
    }

    /// Map one of the image crate's formats onto a supported container.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(ContainerFormat::Jpeg),
            image::ImageFormat::Png => Some(ContainerFormat::Png),
            image::ImageFormat::Bmp => Some(ContainerFormat::Bmp),
            _ => None,
        }
    }

    /// Parse a file extension or short format name ("jpg", "PNG", ...).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" => Some(ContainerFormat::Jpeg),
            "png" => Some(ContainerFormat::Png),
            "bmp" | "dib" => Some(ContainerFormat::Bmp),
            _ => None,
        }
    }

    /// Whether the format can carry an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, ContainerFormat::Jpeg)
    }
}

/// Horizontal and vertical resolution in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Resolution {
    /// Resolution assumed when the source carries none.
    pub const DEFAULT_DPI: f32 = 96.0;

    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Swap the axes, as a quarter-turn rotation does.
    pub fn transposed(self) -> Self {
        Self {
            horizontal: self.vertical,
            vertical: self.horizontal,
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DPI, Self::DEFAULT_DPI)
    }
}

/// TIFF field type of a metadata tag value.
/// See: https://www.awaresystems.be/imaging/tiff/specification/TIFF6.pdf (section 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum PropertyKind {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
}

impl PropertyKind {
    /// Size in bytes of one component of this type.
    pub fn component_size(self) -> usize {
        match self {
            PropertyKind::Byte
            | PropertyKind::Ascii
            | PropertyKind::SByte
            | PropertyKind::Undefined => 1,
            PropertyKind::Short | PropertyKind::SShort => 2,
            PropertyKind::Long | PropertyKind::SLong | PropertyKind::Float => 4,
            PropertyKind::Rational | PropertyKind::SRational | PropertyKind::Double => 8,
        }
    }
}

/// A raw metadata tag value.
///
/// `value` holds the components in little-endian order, so for the
/// single-SHORT orientation tag the first byte is the orientation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyItem {
    pub kind: PropertyKind,
    pub value: Vec<u8>,
}

impl PropertyItem {
    pub fn new(kind: PropertyKind, value: Vec<u8>) -> Self {
        Self { kind, value }
    }

    /// A single SHORT value.
    pub fn short(value: u16) -> Self {
        Self::new(PropertyKind::Short, value.to_le_bytes().to_vec())
    }

    /// A NUL-terminated ASCII string.
    pub fn ascii(text: &str) -> Self {
        let mut value = text.as_bytes().to_vec();
        value.push(0);
        Self::new(PropertyKind::Ascii, value)
    }

    /// A single unsigned RATIONAL value.
    pub fn rational(numerator: u32, denominator: u32) -> Self {
        let mut value = numerator.to_le_bytes().to_vec();
        value.extend_from_slice(&denominator.to_le_bytes());
        Self::new(PropertyKind::Rational, value)
    }

    /// Number of components stored in `value`.
    pub fn count(&self) -> usize {
        self.value.len() / self.kind.component_size()
    }

    /// First component as an unsigned integer, for BYTE/SHORT/LONG values.
    pub fn as_uint(&self) -> Option<u32> {
        match self.kind {
            PropertyKind::Byte | PropertyKind::Undefined => self.value.first().map(|&b| b as u32),
            PropertyKind::Short => {
                let bytes = self.value.get(0..2)?;
                Some(u16::from_le_bytes([bytes[0], bytes[1]]) as u32)
            }
            PropertyKind::Long => {
                let bytes = self.value.get(0..4)?;
                Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            _ => None,
        }
    }

    /// First component of an unsigned RATIONAL as a float.
    pub fn as_rational(&self) -> Option<f32> {
        if self.kind != PropertyKind::Rational {
            return None;
        }
        let bytes = self.value.get(0..8)?;
        let num = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let denom = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if denom == 0 {
            return None;
        }
        Some(num as f32 / denom as f32)
    }
}

/// Image file directory a metadata tag lives in.
///
/// Tag ids are only unique within a group: GPS and interoperability tags
/// both start at 0x0001.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum TagGroup {
    /// IFD0 of the primary image (orientation, resolution, camera make...)
    #[default]
    Tiff,
    /// Exif sub-IFD (capture time, exposure...)
    Exif,
    /// GPS sub-IFD
    Gps,
    /// Interoperability sub-IFD
    Interop,
}

/// Metadata tag identity: the directory it belongs to plus its id.
///
/// A bare `u16` converts to a [`TagGroup::Tiff`] key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TagKey {
    pub group: TagGroup,
    pub id: u16,
}

impl TagKey {
    pub fn new(group: TagGroup, id: u16) -> Self {
        Self { group, id }
    }

    pub fn tiff(id: u16) -> Self {
        Self::new(TagGroup::Tiff, id)
    }

    pub fn exif(id: u16) -> Self {
        Self::new(TagGroup::Exif, id)
    }

    pub fn gps(id: u16) -> Self {
        Self::new(TagGroup::Gps, id)
    }
}

impl From<u16> for TagKey {
    fn from(id: u16) -> Self {
        Self::tiff(id)
    }
}

/// Metadata tags of an image, keyed by directory and tag id.
pub type MetadataTags = BTreeMap<TagKey, PropertyItem>;

/// Derive the DPI resolution from the TIFF resolution tags, if present.
///
/// A missing vertical resolution falls back to the horizontal one. Unit 1
/// ("no absolute unit") yields `None`.
pub fn resolution_from_tags(tags: &MetadataTags) -> Option<Resolution> {
    let horizontal = tags.get(&TagKey::tiff(X_RESOLUTION_TAG))?.as_rational()?;
    let vertical = tags
        .get(&TagKey::tiff(Y_RESOLUTION_TAG))
        .and_then(PropertyItem::as_rational)
        .unwrap_or(horizontal);
    let unit = tags
        .get(&TagKey::tiff(RESOLUTION_UNIT_TAG))
        .and_then(PropertyItem::as_uint)
        .unwrap_or(2);

    let per_inch = match unit {
        2 => 1.0,
        3 => 2.54,
        _ => return None,
    };
    if horizontal <= 0.0 || vertical <= 0.0 {
        return None;
    }
    Some(Resolution::new(horizontal * per_inch, vertical * per_inch))
}

/// A decoded raster image with its resolution, container format and metadata.
///
/// Pixels are stored as RGBA8, so width and height always match the buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
    /// Horizontal/vertical DPI, carried through transforms for metadata.
    pub resolution: Resolution,
    /// Format the image was decoded from.
    pub format: ContainerFormat,
    /// Metadata tag key to raw value.
    pub tags: MetadataTags,
}

impl RasterImage {
    /// Create a RasterImage with default resolution and no metadata.
    pub fn new(pixels: RgbaImage, format: ContainerFormat) -> Self {
        Self {
            pixels,
            resolution: Resolution::default(),
            format,
            tags: MetadataTags::new(),
        }
    }

    /// Create a RasterImage from raw RGBA8 data.
    ///
    /// Returns `None` if the buffer length is not `width * height * 4`.
    pub fn from_raw(
        width: u32,
        height: u32,
        rgba: Vec<u8>,
        format: ContainerFormat,
    ) -> Option<Self> {
        RgbaImage::from_raw(width, height, rgba).map(|pixels| Self::new(pixels, format))
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_tag(mut self, key: impl Into<TagKey>, item: PropertyItem) -> Self {
        self.tags.insert(key.into(), item);
        self
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Look up a tag. A bare `u16` id refers to the TIFF directory.
    pub fn tag(&self, key: impl Into<TagKey>) -> Option<&PropertyItem> {
        self.tags.get(&key.into())
    }

    /// Remove a tag, returning its previous value.
    pub fn remove_tag(&mut self, key: impl Into<TagKey>) -> Option<PropertyItem> {
        self.tags.remove(&key.into())
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
