//! EXIF metadata extraction into raw tag values.

use std::io::Cursor;

use exif::{Context, In, Reader, Tag, Value};
use log::debug;

use super::{MetadataTags, PropertyItem, PropertyKind, TagGroup, TagKey};

// TIFF tags the EXIF writer derives itself from the layout of the file.
const LAYOUT_TAGS: [u16; 9] = [
    0x0111, // StripOffsets
    0x0117, // StripByteCounts
    0x0144, // TileOffsets
    0x0145, // TileByteCounts
    0x0201, // JPEGInterchangeFormat
    0x0202, // JPEGInterchangeFormatLength
    0x8769, // ExifIFDPointer
    0x8825, // GPSInfoIFDPointer
    0xA005, // InteropIFDPointer
];

/// Read the primary image's EXIF tags from an encoded image.
///
/// Fields from IFD0 and from the Exif, GPS and interoperability sub-IFDs
/// are kept, each under its own [`TagGroup`]. Thumbnail (IFD1) fields are
/// dropped. Returns an empty map if the container has no EXIF data or it
/// cannot be parsed. Metadata is best-effort and never fails a decode.
pub fn read_metadata_tags(bytes: &[u8]) -> MetadataTags {
    let mut cursor = Cursor::new(bytes);

    let exif = match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("No usable EXIF metadata: {}", e);
            return MetadataTags::new();
        }
    };

    exif.fields()
        .filter(|field| field.ifd_num == In::PRIMARY)
        .filter_map(|field| {
            let key = tag_key(field.tag)?;
            let item = property_from_value(&field.value)?;
            Some((key, item))
        })
        .collect()
}

/// Map an EXIF tag onto its storage key, skipping layout and pointer tags.
fn tag_key(tag: Tag) -> Option<TagKey> {
    let group = match tag.context() {
        Context::Tiff if LAYOUT_TAGS.contains(&tag.number()) => return None,
        // InteropIFDPointer lives in the Exif directory
        Context::Exif if tag == Tag::InteropIFDPointer => return None,
        Context::Tiff => TagGroup::Tiff,
        Context::Exif => TagGroup::Exif,
        Context::Gps => TagGroup::Gps,
        Context::Interop => TagGroup::Interop,
        _ => return None,
    };
    Some(TagKey::new(group, tag.number()))
}

/// Flatten a parsed EXIF value into its little-endian byte form.
fn property_from_value(value: &Value) -> Option<PropertyItem> {
    let (kind, bytes) = match value {
        Value::Byte(v) => (PropertyKind::Byte, v.clone()),
        Value::Ascii(strings) => {
            let mut bytes = Vec::new();
            for s in strings {
                bytes.extend_from_slice(s);
                bytes.push(0);
            }
            (PropertyKind::Ascii, bytes)
        }
        Value::Short(v) => (
            PropertyKind::Short,
            v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        ),
        Value::Long(v) => (
            PropertyKind::Long,
            v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        ),
        Value::Rational(v) => (
            PropertyKind::Rational,
            v.iter()
                .flat_map(|r| r.num.to_le_bytes().into_iter().chain(r.denom.to_le_bytes()))
                .collect(),
        ),
        Value::SByte(v) => (PropertyKind::SByte, v.iter().map(|&x| x as u8).collect()),
        Value::Undefined(v, _) => (PropertyKind::Undefined, v.clone()),
        Value::SShort(v) => (
            PropertyKind::SShort,
            v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        ),
        Value::SLong(v) => (
            PropertyKind::SLong,
            v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        ),
        Value::SRational(v) => (
            PropertyKind::SRational,
            v.iter()
                .flat_map(|r| r.num.to_le_bytes().into_iter().chain(r.denom.to_le_bytes()))
                .collect(),
        ),
        Value::Float(v) => (
            PropertyKind::Float,
            v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        ),
        Value::Double(v) => (
            PropertyKind::Double,
            v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        ),
        Value::Unknown(..) => return None,
    };
    Some(PropertyItem::new(kind, bytes))
}
