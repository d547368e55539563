//! Serialization of metadata tags back into a JPEG `APP1` EXIF segment.

use std::io::Cursor;

use exif::experimental::Writer;
use exif::{Context, Field, In, Rational, SRational, Tag, Value};

use super::EncodeError;
use crate::decode::{MetadataTags, PropertyItem, PropertyKind, TagGroup};

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const APP0_MARKER: [u8; 2] = [0xFF, 0xE0];
const APP1_MARKER: [u8; 2] = [0xFF, 0xE1];
const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Serialize metadata tags as a little-endian TIFF structure.
///
/// Each tag goes back into the directory named by its [`TagGroup`]; the
/// writer creates the Exif, GPS and interoperability pointers as needed.
/// Tags whose raw value cannot be represented are skipped. Returns `None`
/// when nothing is left to write.
pub fn write_tiff_metadata(tags: &MetadataTags) -> Result<Option<Vec<u8>>, EncodeError> {
    let fields: Vec<Field> = tags
        .iter()
        .filter_map(|(key, item)| {
            value_from_property(item).map(|value| Field {
                tag: Tag(context(key.group), key.id),
                ifd_num: In::PRIMARY,
                value,
            })
        })
        .collect();

    if fields.is_empty() {
        return Ok(None);
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }

    let mut buffer = Cursor::new(Vec::new());
    writer
        .write(&mut buffer, true)
        .map_err(|e| EncodeError::Metadata(e.to_string()))?;

    Ok(Some(buffer.into_inner()))
}

/// Insert an `APP1` EXIF segment holding `tiff` into an encoded JPEG.
///
/// The segment goes right after the JFIF `APP0` segment when there is one,
/// otherwise right after SOI.
pub fn embed_exif_segment(jpeg: &[u8], tiff: &[u8]) -> Result<Vec<u8>, EncodeError> {
    // Segment length counts its own two length bytes.
    let size = 2 + EXIF_HEADER.len() + tiff.len();
    let segment_len = u16::try_from(size).map_err(|_| EncodeError::MetadataTooLarge { size })?;

    if jpeg.len() < 2 || jpeg[0..2] != JPEG_SOI {
        return Err(EncodeError::EncodingFailed(
            "encoder output is missing the JPEG SOI marker".to_string(),
        ));
    }

    let mut insert_at = JPEG_SOI.len();
    if jpeg.len() >= 6 && jpeg[2..4] == APP0_MARKER {
        let app0_len = u16::from_be_bytes([jpeg[4], jpeg[5]]) as usize;
        insert_at += APP0_MARKER.len() + app0_len;
    }
    if insert_at > jpeg.len() {
        return Err(EncodeError::EncodingFailed(
            "truncated APP0 segment in encoder output".to_string(),
        ));
    }

    let mut out = Vec::with_capacity(jpeg.len() + APP1_MARKER.len() + size);
    out.extend_from_slice(&jpeg[..insert_at]);
    out.extend_from_slice(&APP1_MARKER);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(EXIF_HEADER);
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[insert_at..]);
    Ok(out)
}

fn context(group: TagGroup) -> Context {
    match group {
        TagGroup::Tiff => Context::Tiff,
        TagGroup::Exif => Context::Exif,
        TagGroup::Gps => Context::Gps,
        TagGroup::Interop => Context::Interop,
    }
}

/// Rebuild a typed EXIF value from its little-endian byte form.
fn value_from_property(item: &PropertyItem) -> Option<Value> {
    let size = item.kind.component_size();
    if item.value.is_empty() || item.value.len() % size != 0 {
        return None;
    }
    let chunks = item.value.chunks_exact(size);

    let value = match item.kind {
        PropertyKind::Byte => Value::Byte(item.value.clone()),
        PropertyKind::Ascii => Value::Ascii(
            item.value
                .split(|&b| b == 0)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_vec())
                .collect(),
        ),
        PropertyKind::Short => {
            Value::Short(chunks.map(|c| u16::from_le_bytes([c[0], c[1]])).collect())
        }
        PropertyKind::Long => Value::Long(
            chunks
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        PropertyKind::Rational => Value::Rational(
            chunks
                .map(|c| Rational {
                    num: u32::from_le_bytes([c[0], c[1], c[2], c[3]]),
                    denom: u32::from_le_bytes([c[4], c[5], c[6], c[7]]),
                })
                .collect(),
        ),
        PropertyKind::SByte => Value::SByte(item.value.iter().map(|&b| b as i8).collect()),
        PropertyKind::Undefined => Value::Undefined(item.value.clone(), 0),
        PropertyKind::SShort => {
            Value::SShort(chunks.map(|c| i16::from_le_bytes([c[0], c[1]])).collect())
        }
        PropertyKind::SLong => Value::SLong(
            chunks
                .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        PropertyKind::SRational => Value::SRational(
            chunks
                .map(|c| SRational {
                    num: i32::from_le_bytes([c[0], c[1], c[2], c[3]]),
                    denom: i32::from_le_bytes([c[4], c[5], c[6], c[7]]),
                })
                .collect(),
        ),
        PropertyKind::Float => Value::Float(
            chunks
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        PropertyKind::Double => Value::Double(
            chunks
                .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
    };
    Some(value)
}
