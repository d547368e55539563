//! Mapping of EXIF orientation codes to rotate/flip transforms.

use serde::{Deserialize, Serialize};

/// Clockwise rotation by a multiple of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }
}

/// Mirror applied after the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
}

/// A permutation-only geometric transform: rotate clockwise, then flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TransformDescriptor {
    pub rotation: Rotation,
    pub flip: Flip,
}

impl TransformDescriptor {
    /// No rotation, no flip.
    pub const IDENTITY: Self = Self::new(Rotation::None, Flip::None);

    pub const fn new(rotation: Rotation, flip: Flip) -> Self {
        Self { rotation, flip }
    }

    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Returns true if applying this transform swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self.rotation,
            Rotation::Clockwise90 | Rotation::Clockwise270
        )
    }
}

/// Resolve an EXIF orientation code (tag `0x0112`) to the transform that
/// brings the stored pixels upright.
///
/// Codes outside 1..=8 resolve to the identity rather than an error, so
/// corrupt metadata never aborts processing.
/// See: https://exiftool.org/TagNames/EXIF.html
pub fn resolve(orientation: u32) -> TransformDescriptor {
    use Flip::Horizontal as FlipX;

    match orientation {
        2 => TransformDescriptor::new(Rotation::None, FlipX),
        3 => TransformDescriptor::new(Rotation::Clockwise180, Flip::None),
        4 => TransformDescriptor::new(Rotation::Clockwise180, FlipX),
        5 => TransformDescriptor::new(Rotation::Clockwise90, FlipX),
        6 => TransformDescriptor::new(Rotation::Clockwise90, Flip::None),
        7 => TransformDescriptor::new(Rotation::Clockwise270, FlipX),
        8 => TransformDescriptor::new(Rotation::Clockwise270, Flip::None),
        _ => TransformDescriptor::IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_table() {
        let expected = [
            (1, Rotation::None, Flip::None),
            (2, Rotation::None, Flip::Horizontal),
            (3, Rotation::Clockwise180, Flip::None),
            (4, Rotation::Clockwise180, Flip::Horizontal),
            (5, Rotation::Clockwise90, Flip::Horizontal),
            (6, Rotation::Clockwise90, Flip::None),
            (7, Rotation::Clockwise270, Flip::Horizontal),
            (8, Rotation::Clockwise270, Flip::None),
        ];

        for (code, rotation, flip) in expected {
            assert_eq!(
                resolve(code),
                TransformDescriptor::new(rotation, flip),
                "orientation {}",
                code
            );
        }
    }

    #[test]
    fn test_resolve_normal_is_identity() {
        assert!(resolve(1).is_identity());
    }

    #[test]
    fn test_resolve_out_of_range_is_identity() {
        for code in [0, 9, 255, 256, u32::MAX] {
            assert_eq!(resolve(code), TransformDescriptor::IDENTITY, "orientation {}", code);
        }
    }

    #[test]
    fn test_default_is_identity() {
        assert_eq!(TransformDescriptor::default(), TransformDescriptor::IDENTITY);
    }

    #[test]
    fn test_swaps_dimensions() {
        // 1-4 keep dimensions, 5-8 are quarter turns
        for code in 1..=4 {
            assert!(!resolve(code).swaps_dimensions());
        }
        for code in 5..=8 {
            assert!(resolve(code).swaps_dimensions());
        }
    }

    #[test]
    fn test_rotation_degrees() {
        assert_eq!(Rotation::None.degrees(), 0);
        assert_eq!(resolve(6).rotation.degrees(), 90);
        assert_eq!(resolve(3).rotation.degrees(), 180);
        assert_eq!(resolve(8).rotation.degrees(), 270);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Every code outside 1..=8 resolves to the identity.
        #[test]
        fn prop_unknown_codes_are_identity(code in any::<u32>()) {
            prop_assume!(!(1..=8).contains(&code));
            prop_assert!(resolve(code).is_identity());
        }

        /// Property: Only code 1 resolves to the identity within 1..=8.
        #[test]
        fn prop_known_codes_transform(code in 2u32..=8) {
            prop_assert!(!resolve(code).is_identity());
        }
    }
}
