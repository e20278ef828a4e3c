//! Geometric filters: lens distortion correction and chromatic aberration
//!
//! Both remap per-pixel coordinates relative to the image center and read from
//! the untouched source buffer while writing a fresh output buffer.

use crate::buffer::{clamp_to_byte, PixelBuffer};

/// Radial lens distortion correction.
///
/// For each output pixel the source is sampled at
/// `center + (p - center) * (1 - amount * r^2)` with bilinear interpolation on
/// all four channels, where `r` is the center distance normalized by the
/// center-to-corner radius. Output pixels whose source coordinate falls
/// outside the buffer stay at their zero-initialized value (0,0,0,0); the
/// original product behaves this way and the behavior is preserved.
pub fn lens_distortion(src: &PixelBuffer, amount: f32) -> PixelBuffer {
    let mut out = PixelBuffer::new(src.width, src.height);

    let cx = src.width as f32 / 2.0;
    let cy = src.height as f32 / 2.0;
    let max_radius = (cx * cx + cy * cy).sqrt();

    for y in 0..src.height {
        for x in 0..src.width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let r = (dx * dx + dy * dy).sqrt() / max_radius;
            let f = 1.0 - amount * r * r;

            let sx = cx + dx * f;
            let sy = cy + dy * f;

            if let Some(sample) = src.sample_bilinear(sx, sy) {
                out.set(
                    x,
                    y,
                    [
                        clamp_to_byte(sample[0]),
                        clamp_to_byte(sample[1]),
                        clamp_to_byte(sample[2]),
                        clamp_to_byte(sample[3]),
                    ],
                );
            }
        }
    }

    out
}

/// Simulated lens color fringing.
///
/// The red channel is sampled from a position shifted toward the center, the
/// blue channel from a position shifted away from it, both by
/// `shift * 0.01 * (p - center)` with `shift = (dist / max_dist) * amount`.
/// Green and alpha are copied unshifted. Sample coordinates are rounded and
/// clamped to the buffer, not interpolated.
pub fn chromatic_aberration(src: &PixelBuffer, amount: f32) -> PixelBuffer {
    let mut out = PixelBuffer::new(src.width, src.height);

    let cx = src.width as f32 / 2.0;
    let cy = src.height as f32 / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt();

    for y in 0..src.height {
        for x in 0..src.width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let shift = dist / max_dist * amount * 0.01;

            let red = src.get_clamped(
                (x as f32 - dx * shift).round() as i64,
                (y as f32 - dy * shift).round() as i64,
            );
            let blue = src.get_clamped(
                (x as f32 + dx * shift).round() as i64,
                (y as f32 + dy * shift).round() as i64,
            );
            let original = src.get(x, y);

            out.set(x, y, [red[0], original[1], blue[2], original[3]]);
        }
    }

    out
}
