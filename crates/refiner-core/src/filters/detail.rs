//! Frequency-separated detail boosting: micro-contrast and clarity
//!
//! The blurred buffer is the low-frequency layer; `original - blurred` is the
//! high-frequency detail layer. Adding scaled detail back boosts local
//! contrast without shifting overall tone.

use crate::buffer::{clamp_to_byte, luminance, PixelBuffer};
use crate::filters::blur::gaussian_approx_rgb;

/// Midtone luminance band for the clarity stage
const CLARITY_LUMA_MIN: f32 = 50.0;
const CLARITY_LUMA_MAX: f32 = 200.0;

/// Global fine-detail boost: `out = original + detail * (amount - 1)` with a
/// sigma-2 low-frequency layer.
pub fn micro_contrast(buf: &mut PixelBuffer, amount: f32) {
    detail_boost(buf, 2.0, amount, None);
}

/// Midtone detail adjustment: the same formula as micro-contrast with a
/// sigma-5 layer, restricted to pixels whose luminance lies in [50, 200].
/// The `(amount - 1)` gain applies literally, so sub-1.0 amounts soften
/// midtones instead of boosting them.
pub fn clarity(buf: &mut PixelBuffer, amount: f32) {
    detail_boost(buf, 5.0, amount, Some((CLARITY_LUMA_MIN, CLARITY_LUMA_MAX)));
}

fn detail_boost(buf: &mut PixelBuffer, sigma: f32, amount: f32, luma_range: Option<(f32, f32)>) {
    let blurred = gaussian_approx_rgb(buf, sigma);
    let gain = amount - 1.0;

    for (i, px) in buf.data.chunks_exact_mut(4).enumerate() {
        if let Some((lo, hi)) = luma_range {
            let l = luminance(px[0], px[1], px[2]);
            if l < lo || l > hi {
                continue;
            }
        }

        for c in 0..3 {
            let original = px[c] as f32;
            let detail = original - blurred[i * 3 + c];
            px[c] = clamp_to_byte(original + detail * gain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_edge(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 80 } else { 160 };
                buf.set(x, y, [v, v, v, 255]);
            }
        }
        buf
    }

    #[test]
    fn test_micro_contrast_identity_at_one() {
        let mut buf = step_edge(16, 16);
        let before = buf.clone();
        micro_contrast(&mut buf, 1.0);
        assert_eq!(buf, before);
    }

    #[test]
    fn test_micro_contrast_steepens_edges() {
        let mut buf = step_edge(16, 16);
        micro_contrast(&mut buf, 1.5);

        // Darker side of the edge overshoots down, brighter side up
        let left = buf.get(6, 8)[0];
        let right = buf.get(9, 8)[0];
        assert!(left < 80, "left of edge should darken, got {}", left);
        assert!(right > 160, "right of edge should brighten, got {}", right);
    }

    #[test]
    fn test_micro_contrast_noop_on_flat_image() {
        let mut buf = PixelBuffer::new(10, 10);
        for px in buf.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[90, 90, 90, 255]);
        }
        let before = buf.clone();
        micro_contrast(&mut buf, 2.0);
        assert_eq!(buf, before);
    }

    #[test]
    fn test_clarity_skips_shadows_and_highlights() {
        let mut buf = PixelBuffer::new(16, 1);
        for x in 0..16 {
            // Alternate deep shadow and bright highlight; both outside [50,200]
            let v = if x % 2 == 0 { 10 } else { 240 };
            buf.set(x, 0, [v, v, v, 255]);
        }

        let before = buf.clone();
        clarity(&mut buf, 1.8);
        assert_eq!(buf, before);
    }

    #[test]
    fn test_clarity_affects_midtones() {
        let mut buf = step_edge(24, 8);
        let before = buf.clone();
        clarity(&mut buf, 1.8);
        assert_ne!(buf, before);
    }

    #[test]
    fn test_clarity_sub_one_softens_midtones() {
        let mut buf = step_edge(24, 8);
        clarity(&mut buf, 0.1);

        // Negative gain blends toward the blurred layer: the edge flattens
        let left = buf.get(10, 4)[0];
        let right = buf.get(13, 4)[0];
        assert!(left > 80);
        assert!(right < 160);
    }
}
