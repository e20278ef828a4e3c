//! Tonal filters: shadow lift, highlight recovery, tone curve, color balance
//!
//! All tonal stages operate per pixel. Shadow/highlight adjustments are gated
//! by the luminance estimate `L = 0.299R + 0.587G + 0.114B`.

use crate::buffer::{clamp_to_byte, luminance, PixelBuffer};

/// Luminance below which shadow lift applies
const SHADOW_CEILING: f32 = 80.0;

/// Luminance above which highlight recovery applies
const HIGHLIGHT_FLOOR: f32 = 180.0;

/// Additively lift dark pixels, strongest at black and fading out at
/// luminance 80.
pub fn shadow_lift(buf: &mut PixelBuffer, lift: f32) {
    for px in buf.data.chunks_exact_mut(4) {
        let l = luminance(px[0], px[1], px[2]);
        if l < SHADOW_CEILING {
            let add = (1.0 - l / SHADOW_CEILING) * lift;
            for c in px.iter_mut().take(3) {
                *c = clamp_to_byte(*c as f32 + add);
            }
        }
    }
}

/// Additively adjust bright pixels, strongest at white and fading out at
/// luminance 180. The amount is normally negative (pulling highlights down).
pub fn highlight_recovery(buf: &mut PixelBuffer, amount: f32) {
    for px in buf.data.chunks_exact_mut(4) {
        let l = luminance(px[0], px[1], px[2]);
        if l > HIGHLIGHT_FLOOR {
            let add = (l - HIGHLIGHT_FLOOR) / 75.0 * amount;
            for c in px.iter_mut().take(3) {
                *c = clamp_to_byte(*c as f32 + add);
            }
        }
    }
}

/// Logistic S-curve contrast on each RGB channel.
///
/// Channels are normalized to [0,1] and remapped with
/// `f(x) = 1 / (1 + e^(-k(x - 0.5)))` where `k = (contrast - 1) * 10 + 4`.
/// The steepness floor of 4 means the curve is a genuine S-curve even at
/// `contrast = 1.0`; only the 0.5 midpoint is a fixed point.
pub fn tone_curve(buf: &mut PixelBuffer, contrast: f32) {
    let k = (contrast - 1.0) * 10.0 + 4.0;

    // 256-entry lookup; the curve only depends on the input byte
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        let x = v as f32 / 255.0;
        let curved = 1.0 / (1.0 + (-k * (x - 0.5)).exp());
        *out = clamp_to_byte(curved * 255.0);
    }

    for px in buf.data.chunks_exact_mut(4) {
        px[0] = lut[px[0] as usize];
        px[1] = lut[px[1] as usize];
        px[2] = lut[px[2] as usize];
    }
}

/// Brightness, vibrance, and saturation in one per-pixel pass, in that order.
///
/// Brightness multiplies all channels. Vibrance (above 1.0) pulls non-maximal
/// channels toward the per-pixel maximum by `(max - avg) * 2/255 * (vibrance - 1)`,
/// favoring muted pixels over already-saturated ones. Saturation then scales
/// each channel's distance from the post-vibrance per-pixel average.
pub fn color_balance(buf: &mut PixelBuffer, brightness: f32, vibrance: f32, saturation: f32) {
    for px in buf.data.chunks_exact_mut(4) {
        let mut r = (px[0] as f32 * brightness).clamp(0.0, 255.0);
        let mut g = (px[1] as f32 * brightness).clamp(0.0, 255.0);
        let mut b = (px[2] as f32 * brightness).clamp(0.0, 255.0);

        if vibrance > 1.0 {
            let max = r.max(g).max(b);
            let avg = (r + g + b) / 3.0;
            let amt = (max - avg) * 2.0 / 255.0 * (vibrance - 1.0);

            if r < max {
                r += (max - r) * amt;
            }
            if g < max {
                g += (max - g) * amt;
            }
            if b < max {
                b += (max - b) * amt;
            }
        }

        let avg = (r + g + b) / 3.0;
        px[0] = clamp_to_byte(avg + (r - avg) * saturation);
        px[1] = clamp_to_byte(avg + (g - avg) * saturation);
        px[2] = clamp_to_byte(avg + (b - avg) * saturation);
    }
}
