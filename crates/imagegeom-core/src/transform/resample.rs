//! Separable bicubic resampling of a source rectangle into a destination buffer.
//!
//! # Algorithm
//!
//! Each destination pixel `d` along an axis samples the source at its centre
//! (high-quality pixel offset):
//!
//! ```text
//! center = origin + (d + 0.5) * scale - 0.5      scale = extent / dst_len
//! ```
//!
//! and weights the neighbouring source pixels with the Catmull-Rom cubic.
//! When downscaling (`scale > 1`) the kernel is stretched by `scale` so every
//! source pixel contributes (anti-aliasing). The horizontal pass runs over
//! the source rows the vertical pass needs, then the vertical pass produces
//! the output. Colour is filtered premultiplied by alpha.
//!
//! # Edge Policy
//!
//! - Kernel taps that fall outside the source are clamped to the nearest
//!   edge pixel.
//! - A destination pixel whose sample centre lies outside the source image
//!   on either axis is transparent black.
//!
//! # Limits
//!
//! Destinations wider or taller than [`MAX_DIMENSION`], or larger than
//! [`MAX_PIXELS`] in total, fail with [`Error::Allocation`] before any
//! buffer or tap table is built.

use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Catmull-Rom support radius in source pixels at scale 1.
const SUPPORT: f32 = 2.0;

/// Largest destination width or height.
pub(crate) const MAX_DIMENSION: u32 = 1 << 18;

/// Largest destination pixel count (1 GiB of RGBA8).
pub(crate) const MAX_PIXELS: u64 = 1 << 28;

/// Source rectangle in pixel units. It may extend past the image bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SourceRect {
    /// The whole image.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Source index and normalized weight.
type Taps = Vec<(usize, f32)>;

/// Resample `rect` of `src` into a new `dst_width x dst_height` image.
///
/// The mapping is a direct rectangle-to-rectangle stretch; aspect ratio is
/// not preserved.
pub(crate) fn resample(
    src: &RgbaImage,
    rect: SourceRect,
    dst_width: u32,
    dst_height: u32,
) -> Result<RgbaImage> {
    let too_large = Error::Allocation {
        width: dst_width,
        height: dst_height,
    };
    if dst_width > MAX_DIMENSION
        || dst_height > MAX_DIMENSION
        || dst_width as u64 * dst_height as u64 > MAX_PIXELS
    {
        return Err(too_large);
    }

    let mut out = allocate(dst_width, dst_height)?;
    if out.is_empty() || src.is_empty() {
        return Ok(out);
    }

    let (Some(columns), Some(rows)) = (
        axis_taps(src.width(), rect.x, rect.width, dst_width),
        axis_taps(src.height(), rect.y, rect.height, dst_height),
    ) else {
        return Err(too_large);
    };

    // Band of source rows touched by the vertical pass
    let touched = rows
        .iter()
        .flatten()
        .flat_map(|taps| taps.iter().map(|&(i, _)| i));
    let (row_min, row_max) = match touched.fold(None, |range: Option<(usize, usize)>, i| {
        Some(range.map_or((i, i), |(lo, hi)| (lo.min(i), hi.max(i))))
    }) {
        Some(range) => range,
        None => return Ok(out),
    };

    let dst_w = dst_width as usize;
    let band_len = (row_max - row_min + 1)
        .checked_mul(dst_w)
        .ok_or(Error::Allocation {
            width: dst_width,
            height: dst_height,
        })?;
    let mut band = try_filled(band_len, [0.0f32; 4]).ok_or(Error::Allocation {
        width: dst_width,
        height: dst_height,
    })?;

    // Horizontal pass
    for (r, band_row) in band.chunks_exact_mut(dst_w).enumerate() {
        let y = (row_min + r) as u32;
        for (dx, taps) in columns.iter().enumerate() {
            let Some(taps) = taps else { continue };
            let mut acc = [0.0f32; 4];
            for &(sx, weight) in taps {
                let p = premultiplied(src.get_pixel(sx as u32, y));
                for c in 0..4 {
                    acc[c] += p[c] * weight;
                }
            }
            band_row[dx] = acc;
        }
    }

    // Vertical pass
    for (dy, taps) in rows.iter().enumerate() {
        let Some(taps) = taps else { continue };
        for dx in 0..dst_w {
            let mut acc = [0.0f32; 4];
            for &(sy, weight) in taps {
                let p = band[(sy - row_min) * dst_w + dx];
                for c in 0..4 {
                    acc[c] += p[c] * weight;
                }
            }
            out.put_pixel(dx as u32, dy as u32, unpremultiplied(acc));
        }
    }

    Ok(out)
}

/// Catmull-Rom cubic convolution kernel (Keys, a = -0.5).
fn cubic(x: f32) -> f32 {
    let x = x.abs();
    if x < 1.0 {
        (1.5 * x - 2.5) * x * x + 1.0
    } else if x < 2.0 {
        ((-0.5 * x + 2.5) * x - 4.0) * x + 2.0
    } else {
        0.0
    }
}

/// Taps for every destination index along one axis.
///
/// `None` marks destination samples whose centre falls outside the source.
/// Returns `None` if the table itself cannot be allocated.
fn axis_taps(
    src_len: u32,
    origin: f32,
    extent: f32,
    dst_len: u32,
) -> Option<Vec<Option<Taps>>> {
    let scale = extent / dst_len as f32;
    let filter_scale = scale.max(1.0);
    let support = SUPPORT * filter_scale;
    let last = src_len as i64 - 1;

    let mut table = Vec::new();
    table.try_reserve_exact(dst_len as usize).ok()?;

    for d in 0..dst_len {
        let center = origin + (d as f32 + 0.5) * scale;
        if !(0.0..src_len as f32).contains(&center) {
            table.push(None);
            continue;
        }
        let center = center - 0.5;

        let first = (center - support).ceil() as i64;
        let end = (center + support).floor() as i64;

        let mut taps = Taps::new();
        taps.try_reserve_exact((end - first + 1).max(0) as usize).ok()?;
        let mut total = 0.0f32;
        for i in first..=end {
            let weight = cubic((i as f32 - center) / filter_scale);
            if weight == 0.0 {
                continue;
            }
            taps.push((i.clamp(0, last) as usize, weight));
            total += weight;
        }
        if total.abs() < f32::EPSILON {
            table.push(None);
            continue;
        }
        for tap in &mut taps {
            tap.1 /= total;
        }
        table.push(Some(taps));
    }
    Some(table)
}

#[inline]
fn premultiplied(p: &Rgba<u8>) -> [f32; 4] {
    let alpha = p[3] as f32;
    let f = alpha / 255.0;
    [p[0] as f32 * f, p[1] as f32 * f, p[2] as f32 * f, alpha]
}

#[inline]
fn unpremultiplied(acc: [f32; 4]) -> Rgba<u8> {
    let alpha = acc[3].clamp(0.0, 255.0).round();
    if alpha == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let f = alpha / 255.0;
    let mut result = [0u8; 4];
    for c in 0..3 {
        result[c] = (acc[c] / f).clamp(0.0, 255.0).round() as u8;
    }
    result[3] = alpha as u8;
    Rgba(result)
}

/// Zero-initialized RGBA buffer, failing instead of aborting on allocation.
fn allocate(width: u32, height: u32) -> Result<RgbaImage> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .and_then(|len| try_filled(len, 0u8))
        .and_then(|buffer| RgbaImage::from_raw(width, height, buffer))
        .ok_or(Error::Allocation { width, height })
}

fn try_filled<T: Clone>(len: usize, value: T) -> Option<Vec<T>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).ok()?;
    buffer.resize(len, value);
    Some(buffer)
}
