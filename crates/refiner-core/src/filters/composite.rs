//! Compositing filters: luminance-zone tints, color grades, grain, vignette
//!
//! These run last, in a fixed order. Blend modes are a small closed set and
//! are implemented as explicit functions rather than relying on any platform
//! compositing.

use crate::buffer::{clamp_to_byte, luminance, PixelBuffer};
use crate::models::{ColorGrade, Tint};
use rand::Rng;

/// Compositing blend modes used by the color grades and vignette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// `base * blend / 255`
    Multiply,

    /// Doubles contrast around mid-gray, branching on the base channel
    Overlay,

    /// Overlay with the roles swapped: the blend channel picks the branch
    HardLight,
}

impl BlendMode {
    /// Blend a single channel pair in the 0-255 domain
    pub fn apply(self, base: f32, blend: f32) -> f32 {
        match self {
            Self::Multiply => base * blend / 255.0,
            Self::Overlay => {
                if base < 128.0 {
                    2.0 * base * blend / 255.0
                } else {
                    255.0 - 2.0 * (255.0 - base) * (255.0 - blend) / 255.0
                }
            }
            Self::HardLight => Self::Overlay.apply(blend, base),
        }
    }
}

/// Composite a flat color layer over the whole frame at the given alpha
pub fn blend_color(buf: &mut PixelBuffer, color: [u8; 3], mode: BlendMode, alpha: f32) {
    for px in buf.data.chunks_exact_mut(4) {
        for c in 0..3 {
            let base = px[c] as f32;
            let blended = mode.apply(base, color[c] as f32);
            px[c] = clamp_to_byte(base * (1.0 - alpha) + blended * alpha);
        }
    }
}

/// Blend tint colors into shadow and highlight luminance zones.
///
/// Shadows (`L < 80`) take up to 10% of the shadow tint, strongest at black;
/// highlights (`L > 200`) take up to 5% of the highlight tint, strongest at
/// white. The zones are disjoint, so at most one tint applies per pixel.
pub fn zone_tints(buf: &mut PixelBuffer, shadow: Option<Tint>, highlight: Option<Tint>) {
    if shadow.is_none() && highlight.is_none() {
        return;
    }

    for px in buf.data.chunks_exact_mut(4) {
        let l = luminance(px[0], px[1], px[2]);

        if l < 80.0 {
            if let Some(tint) = shadow {
                let strength = (1.0 - l / 80.0) * 0.10;
                mix_tint(px, tint, strength);
            }
        } else if l > 200.0 {
            if let Some(tint) = highlight {
                let strength = (l - 200.0) / 55.0 * 0.05;
                mix_tint(px, tint, strength);
            }
        }
    }
}

fn mix_tint(px: &mut [u8], tint: Tint, strength: f32) {
    let target = [tint.r, tint.g, tint.b];
    for c in 0..3 {
        let base = px[c] as f32;
        px[c] = clamp_to_byte(base * (1.0 - strength) + target[c] as f32 * strength);
    }
}

/// Apply the preset's stylized color-grade overlay
pub fn color_grade(buf: &mut PixelBuffer, grade: ColorGrade) {
    match grade {
        ColorGrade::None | ColorGrade::Vibrant => {}
        ColorGrade::TealOrange => {
            // Cyan-ish wash over the whole frame, then warm the highlights
            blend_color(buf, [45, 140, 150], BlendMode::Overlay, 0.12);
            highlight_pass(buf, [255, 165, 70], BlendMode::HardLight, 0.08);
        }
        ColorGrade::Natural => {
            blend_color(buf, [255, 244, 230], BlendMode::Overlay, 0.08);
        }
    }
}

/// Composite a color into pixels above mid luminance, alpha ramping from zero
/// at `L = 128` up to `max_alpha` at white.
fn highlight_pass(buf: &mut PixelBuffer, color: [u8; 3], mode: BlendMode, max_alpha: f32) {
    for px in buf.data.chunks_exact_mut(4) {
        let l = luminance(px[0], px[1], px[2]);
        if l <= 128.0 {
            continue;
        }
        let alpha = max_alpha * (l - 128.0) / 127.0;
        for c in 0..3 {
            let base = px[c] as f32;
            let blended = mode.apply(base, color[c] as f32);
            px[c] = clamp_to_byte(base * (1.0 - alpha) + blended * alpha);
        }
    }
}

/// Add independent uniform noise in [-5, +5] to each of R, G, B per pixel.
///
/// The RNG is injected so callers (and tests) can pin the seed.
pub fn film_grain<R: Rng>(buf: &mut PixelBuffer, rng: &mut R) {
    for px in buf.data.chunks_exact_mut(4) {
        for c in 0..3 {
            let noise = (rng.gen::<f32>() - 0.5) * 10.0;
            px[c] = clamp_to_byte(px[c] as f32 + noise);
        }
    }
}

/// Multiply-blend a radial gradient that darkens the corners: transparent up
/// to 50% of the short dimension from center, ~15% darkening at 80%.
pub fn vignette(buf: &mut PixelBuffer) {
    let cx = buf.width as f32 / 2.0;
    let cy = buf.height as f32 / 2.0;
    let short = buf.width.min(buf.height) as f32;

    for y in 0..buf.height {
        for x in 0..buf.width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt();

            let strength = ((d / short - 0.5) * 0.5).clamp(0.0, 0.35);
            if strength <= 0.0 {
                continue;
            }

            // Multiply blend against black at the gradient's alpha
            let px = buf.get(x, y);
            buf.set(
                x,
                y,
                [
                    clamp_to_byte(px[0] as f32 * (1.0 - strength)),
                    clamp_to_byte(px[1] as f32 * (1.0 - strength)),
                    clamp_to_byte(px[2] as f32 * (1.0 - strength)),
                    px[3],
                ],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn filled(width: u32, height: u32, px: [u8; 4]) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height);
        for p in buf.data.chunks_exact_mut(4) {
            p.copy_from_slice(&px);
        }
        buf
    }

    #[test]
    fn test_multiply_blend() {
        assert_eq!(BlendMode::Multiply.apply(255.0, 255.0), 255.0);
        assert_eq!(BlendMode::Multiply.apply(255.0, 0.0), 0.0);
        assert_eq!(BlendMode::Multiply.apply(128.0, 128.0), 128.0 * 128.0 / 255.0);
    }

    #[test]
    fn test_overlay_blend_branches_on_base() {
        // Dark base: multiply-like; bright base: screen-like
        assert!(BlendMode::Overlay.apply(60.0, 128.0) < 128.0);
        assert!(BlendMode::Overlay.apply(200.0, 128.0) > 128.0);
        // Extremes are fixed points
        assert_eq!(BlendMode::Overlay.apply(0.0, 77.0), 0.0);
        assert_eq!(BlendMode::Overlay.apply(255.0, 77.0), 255.0);
    }

    #[test]
    fn test_hard_light_swaps_roles() {
        assert_eq!(
            BlendMode::HardLight.apply(40.0, 200.0),
            BlendMode::Overlay.apply(200.0, 40.0)
        );
    }

    #[test]
    fn test_zone_tints_shadow_only_touches_shadows() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.set(0, 0, [20, 20, 20, 255]);
        buf.set(1, 0, [128, 128, 128, 255]);

        zone_tints(&mut buf, Some(Tint { r: 30, g: 40, b: 70 }), None);

        // Shadow pixel pulls toward the tint: blue up, red stays close
        let shadow = buf.get(0, 0);
        assert!(shadow[2] > 20);
        // Midtone untouched
        assert_eq!(buf.get(1, 0), [128, 128, 128, 255]);
    }

    #[test]
    fn test_zone_tints_highlight_strength_capped() {
        let mut buf = filled(1, 1, [255, 255, 255, 255]);
        zone_tints(&mut buf, None, Some(Tint { r: 0, g: 0, b: 0 }));

        // Max 5% pull toward black at pure white
        let px = buf.get(0, 0);
        assert!(px[0] >= 242, "highlight tint exceeded 5% cap: {}", px[0]);
        assert!(px[0] < 255);
    }

    #[test]
    fn test_color_grade_vibrant_and_none_are_noops() {
        let mut buf = filled(4, 4, [90, 120, 200, 255]);
        let before = buf.clone();

        color_grade(&mut buf, ColorGrade::None);
        assert_eq!(buf, before);

        color_grade(&mut buf, ColorGrade::Vibrant);
        assert_eq!(buf, before);
    }

    #[test]
    fn test_color_grade_teal_orange_changes_pixels() {
        let mut buf = filled(4, 4, [90, 120, 200, 255]);
        let before = buf.clone();
        color_grade(&mut buf, ColorGrade::TealOrange);
        assert_ne!(buf, before);
    }

    #[test]
    fn test_film_grain_bounded_and_seeded() {
        let base = filled(8, 8, [128, 128, 128, 255]);

        let mut a = base.clone();
        let mut b = base.clone();
        film_grain(&mut a, &mut StdRng::seed_from_u64(42));
        film_grain(&mut b, &mut StdRng::seed_from_u64(42));

        // Same seed, same noise
        assert_eq!(a, b);

        // Noise stays within the documented +/-5 bound
        for (i, px) in a.data.chunks_exact(4).enumerate() {
            let orig = base.data[i * 4];
            for c in 0..3 {
                assert!((px[c] as i16 - orig as i16).abs() <= 5);
            }
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn test_vignette_center_untouched_corners_darkened() {
        let mut buf = filled(100, 100, [200, 200, 200, 255]);
        vignette(&mut buf);

        // Center and edge midpoints are inside the transparent radius
        assert_eq!(buf.get(50, 50), [200, 200, 200, 255]);
        assert_eq!(buf.get(0, 50), [200, 200, 200, 255]);

        // Corner distance is ~0.707 of the short dimension: darkened
        let corner = buf.get(0, 0);
        assert!(corner[0] < 200);
        assert_eq!(corner[3], 255);
    }

    #[test]
    fn test_vignette_darkening_matches_gradient() {
        let mut buf = filled(200, 100, [100, 100, 100, 255]);
        vignette(&mut buf);

        // Pixel at 80% of the short dimension from center: ~15% darkening
        let px = buf.get(180, 50); // d = 80, short = 100
        let expected = (100.0_f64 * (1.0 - 0.15)).round() as u8;
        assert_eq!(px[0], expected);
    }
}
