//! File-based orientation normalization against real temporary files.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{Rgba, RgbaImage};
use imagegeom_core::decode::PropertyItem;
use imagegeom_core::{
    decode_image, encode_image, ContainerFormat, EncodeOptions, Flip, ImageProcessor,
    RasterImage, Rotation, TagKey, TransformDescriptor, ORIENTATION_TAG,
};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique path in the system temp directory.
fn temp_path(name: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "imagegeom-{}-{}-{}",
        std::process::id(),
        n,
        name
    ))
}

const DATE_TIME_ORIGINAL: u16 = 0x9003;
const GPS_LATITUDE_REF: u16 = 0x0001;
const MAKE: u16 = 0x010F;

/// 40x20 JPEG, left half red and right half blue, optionally tagged.
fn write_jpeg(orientation: Option<u16>) -> PathBuf {
    write_jpeg_with(orientation, &[])
}

fn write_jpeg_with(orientation: Option<u16>, extra: &[(TagKey, PropertyItem)]) -> PathBuf {
    let pixels = RgbaImage::from_fn(40, 20, |x, _| {
        if x < 20 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    let mut image = RasterImage::new(pixels, ContainerFormat::Jpeg);
    if let Some(code) = orientation {
        image = image.with_tag(ORIENTATION_TAG, PropertyItem::short(code));
    }
    for (key, item) in extra {
        image = image.with_tag(*key, item.clone());
    }

    let bytes = encode_image(&image, ContainerFormat::Jpeg, &EncodeOptions::default()).unwrap();
    let path = temp_path("source.jpg");
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_rotated_jpeg_is_written_upright() {
    let source = write_jpeg(Some(6));
    let target = temp_path("target.jpg");

    let applied = ImageProcessor::new()
        .normalize_file(&source, &target, ContainerFormat::Jpeg, true)
        .unwrap();

    assert_eq!(
        applied,
        TransformDescriptor::new(Rotation::Clockwise90, Flip::None)
    );

    let written = decode_image(&fs::read(&target).unwrap()).unwrap();
    assert_eq!(written.dimensions(), (20, 40));
    assert!(written.tag(ORIENTATION_TAG).is_none());

    // Red half ends up on top after a clockwise quarter turn
    let top = written.pixels().get_pixel(10, 5).0;
    let bottom = written.pixels().get_pixel(10, 35).0;
    assert!(top[0] > 200 && top[2] < 60, "top {:?}", top);
    assert!(bottom[2] > 200 && bottom[0] < 60, "bottom {:?}", bottom);

    fs::remove_file(&source).ok();
    fs::remove_file(&target).ok();
}

#[test]
fn test_tag_kept_when_not_removed() {
    let source = write_jpeg(Some(3));
    let target = temp_path("target-keep.jpg");

    ImageProcessor::new()
        .normalize_file(&source, &target, ContainerFormat::Jpeg, false)
        .unwrap();

    let written = decode_image(&fs::read(&target).unwrap()).unwrap();
    assert_eq!(written.dimensions(), (40, 20));
    assert_eq!(written.tag(ORIENTATION_TAG), Some(&PropertyItem::short(3)));

    fs::remove_file(&source).ok();
    fs::remove_file(&target).ok();
}

#[test]
fn test_camera_metadata_survives_normalization() {
    let source = write_jpeg_with(
        Some(6),
        &[
            (TagKey::tiff(MAKE), PropertyItem::ascii("Canon")),
            (
                TagKey::exif(DATE_TIME_ORIGINAL),
                PropertyItem::ascii("2024:01:02 03:04:05"),
            ),
            (TagKey::gps(GPS_LATITUDE_REF), PropertyItem::ascii("N")),
        ],
    );
    let target = temp_path("target-camera.jpg");

    // The fixture really carries the sub-directory tags
    let original = decode_image(&fs::read(&source).unwrap()).unwrap();
    assert!(original.tag(TagKey::exif(DATE_TIME_ORIGINAL)).is_some());

    ImageProcessor::new()
        .normalize_file(&source, &target, ContainerFormat::Jpeg, true)
        .unwrap();

    let written = decode_image(&fs::read(&target).unwrap()).unwrap();
    assert_eq!(written.dimensions(), (20, 40));
    assert!(written.tag(ORIENTATION_TAG).is_none());
    assert_eq!(
        written.tag(TagKey::exif(DATE_TIME_ORIGINAL)),
        Some(&PropertyItem::ascii("2024:01:02 03:04:05"))
    );
    assert_eq!(
        written.tag(TagKey::gps(GPS_LATITUDE_REF)),
        Some(&PropertyItem::ascii("N"))
    );
    assert_eq!(written.tag(MAKE), Some(&PropertyItem::ascii("Canon")));

    fs::remove_file(&source).ok();
    fs::remove_file(&target).ok();
}

#[test]
fn test_target_format_is_honoured() {
    let source = write_jpeg(Some(8));
    let target = temp_path("target.png");

    ImageProcessor::new()
        .normalize_file(&source, &target, ContainerFormat::Png, true)
        .unwrap();

    let written = decode_image(&fs::read(&target).unwrap()).unwrap();
    assert_eq!(written.format, ContainerFormat::Png);
    assert_eq!(written.dimensions(), (20, 40));

    fs::remove_file(&source).ok();
    fs::remove_file(&target).ok();
}

#[test]
fn test_identity_orientation_writes_nothing() {
    for orientation in [None, Some(1), Some(42)] {
        let source = write_jpeg(orientation);
        let target = temp_path("untouched.jpg");

        let applied = ImageProcessor::new()
            .normalize_file(&source, &target, ContainerFormat::Jpeg, true)
            .unwrap();

        assert!(applied.is_identity(), "{:?}", orientation);
        assert!(!target.exists(), "{:?} created a target file", orientation);

        fs::remove_file(&source).ok();
    }
}

#[test]
fn test_corrupt_source_is_an_error() {
    let source = temp_path("corrupt.jpg");
    fs::write(&source, b"\xFF\xD8 definitely not a jpeg").unwrap();
    let target = temp_path("corrupt-target.jpg");

    let result =
        ImageProcessor::new().normalize_file(&source, &target, ContainerFormat::Jpeg, true);

    assert!(matches!(result, Err(imagegeom_core::Error::Decode(_))));
    assert!(!target.exists());

    fs::remove_file(&source).ok();
}
