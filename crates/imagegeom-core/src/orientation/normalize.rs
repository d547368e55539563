//! In-place orientation correction driven by the EXIF orientation tag.

use image::imageops;
use log::debug;

use super::{resolve, Flip, Rotation, TransformDescriptor};
use crate::decode::RasterImage;

/// EXIF tag id of the orientation field.
pub const ORIENTATION_TAG: u16 = 0x0112;

/// Read the orientation tag and rotate/flip the pixels so the image is upright.
///
/// The first byte of the tag value is the orientation code. When the
/// resolved transform is not the identity it is applied in place, and if
/// `remove_tag` is set the orientation tag is then deleted. An image without
/// the tag, or whose code resolves to the identity, is left untouched
/// (pixels and tags alike).
///
/// Returns the transform that was applied.
pub fn normalize(image: &mut RasterImage, remove_tag: bool) -> TransformDescriptor {
    let Some(item) = image.tag(ORIENTATION_TAG) else {
        return TransformDescriptor::IDENTITY;
    };

    let code = item.value.first().copied().unwrap_or(0);
    let descriptor = resolve(u32::from(code));
    if descriptor.is_identity() {
        return descriptor;
    }

    apply_transform(image, descriptor);
    if remove_tag {
        image.remove_tag(ORIENTATION_TAG);
    }

    debug!(
        "Applied orientation {} (rotate {}°, flip {:?})",
        code,
        descriptor.rotation.degrees(),
        descriptor.flip
    );
    descriptor
}

/// Apply a rotate-then-flip transform to the pixel buffer.
///
/// Only pixel positions change; values are never resampled. Quarter turns
/// also swap the horizontal and vertical resolution.
pub fn apply_transform(image: &mut RasterImage, descriptor: TransformDescriptor) {
    let pixels = image.pixels_mut();

    match descriptor.rotation {
        Rotation::None => {}
        Rotation::Clockwise90 => *pixels = imageops::rotate90(&*pixels),
        Rotation::Clockwise180 => imageops::rotate180_in_place(pixels),
        Rotation::Clockwise270 => *pixels = imageops::rotate270(&*pixels),
    }

    if descriptor.flip == Flip::Horizontal {
        imageops::flip_horizontal_in_place(pixels);
    }

    if descriptor.swaps_dimensions() {
        image.resolution = image.resolution.transposed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{ContainerFormat, PropertyItem, Resolution};

    /// 3x2 image whose red channel encodes the pixel index:
    ///
    /// ```text
    /// 0 1 2
    /// 3 4 5
    /// ```
    fn indexed_image() -> RasterImage {
        let mut rgba = Vec::new();
        for i in 0..6u8 {
            rgba.extend_from_slice(&[i, 0, 0, 255]);
        }
        RasterImage::from_raw(3, 2, rgba, ContainerFormat::Jpeg).unwrap()
    }

    /// Red channel of every pixel in row-major order.
    fn layout(image: &RasterImage) -> Vec<u8> {
        image.pixels().pixels().map(|p| p.0[0]).collect()
    }

    fn with_orientation(code: u16) -> RasterImage {
        indexed_image().with_tag(ORIENTATION_TAG, PropertyItem::short(code))
    }

    #[test]
    fn test_no_tag_is_noop() {
        let mut img = indexed_image();
        let before = img.clone();

        let applied = normalize(&mut img, true);

        assert!(applied.is_identity());
        assert_eq!(img, before);
    }

    #[test]
    fn test_identity_tag_kept() {
        for remove_tag in [false, true] {
            let mut img = with_orientation(1);
            let before = img.clone();

            let applied = normalize(&mut img, remove_tag);

            assert!(applied.is_identity());
            assert_eq!(img, before);
            assert_eq!(img.tag(ORIENTATION_TAG), Some(&PropertyItem::short(1)));
        }
    }

    #[test]
    fn test_out_of_range_tag_kept() {
        let mut img = with_orientation(9);
        let applied = normalize(&mut img, true);

        assert!(applied.is_identity());
        assert_eq!(img.tag(ORIENTATION_TAG), Some(&PropertyItem::short(9)));
        assert_eq!(layout(&img), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_tag_value_is_identity() {
        let mut img = indexed_image().with_tag(
            ORIENTATION_TAG,
            PropertyItem::new(crate::decode::PropertyKind::Short, vec![]),
        );
        assert!(normalize(&mut img, true).is_identity());
        assert!(img.tag(ORIENTATION_TAG).is_some());
    }

    #[test]
    fn test_tag_removed_after_transform() {
        let mut img = with_orientation(6);
        let applied = normalize(&mut img, true);

        assert_eq!(applied, resolve(6));
        assert!(img.tag(ORIENTATION_TAG).is_none());
    }

    #[test]
    fn test_tag_kept_when_not_requested() {
        let mut img = with_orientation(6);
        normalize(&mut img, false);

        assert_eq!(img.tag(ORIENTATION_TAG), Some(&PropertyItem::short(6)));
    }

    #[test]
    fn test_pixel_layouts() {
        // Upright layouts of the 3x2 indexed image for each orientation code.
        let cases: [(u16, (u32, u32), [u8; 6]); 7] = [
            (2, (3, 2), [2, 1, 0, 5, 4, 3]),
            (3, (3, 2), [5, 4, 3, 2, 1, 0]),
            (4, (3, 2), [3, 4, 5, 0, 1, 2]),
            (5, (2, 3), [0, 3, 1, 4, 2, 5]),
            (6, (2, 3), [3, 0, 4, 1, 5, 2]),
            (7, (2, 3), [5, 2, 4, 1, 3, 0]),
            (8, (2, 3), [2, 5, 1, 4, 0, 3]),
        ];

        for (code, dims, expected) in cases {
            let mut img = with_orientation(code);
            normalize(&mut img, true);

            assert_eq!(img.dimensions(), dims, "orientation {}", code);
            assert_eq!(layout(&img), expected.to_vec(), "orientation {}", code);
        }
    }

    #[test]
    fn test_quarter_turn_swaps_resolution() {
        let mut img = with_orientation(6).with_resolution(Resolution::new(300.0, 150.0));
        normalize(&mut img, true);
        assert_eq!(img.resolution, Resolution::new(150.0, 300.0));

        let mut img = with_orientation(3).with_resolution(Resolution::new(300.0, 150.0));
        normalize(&mut img, true);
        assert_eq!(img.resolution, Resolution::new(300.0, 150.0));
    }

    #[test]
    fn test_identity_transform_is_noop() {
        let mut img = indexed_image();
        apply_transform(&mut img, TransformDescriptor::IDENTITY);
        assert_eq!(layout(&img), vec![0, 1, 2, 3, 4, 5]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
