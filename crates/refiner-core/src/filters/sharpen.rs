//! Convolution sharpen
//!
//! Fixed 3x3 edge-enhancement kernel, blended with the original by the
//! preset's sharpen amount. Unlike the tone curve, an amount of exactly 1.0
//! is a true identity.

use crate::buffer::{clamp_to_byte, PixelBuffer};

/// Edge-enhancement kernel; taps sum to 1
const KERNEL: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

/// Convolve each RGB channel with the sharpen kernel and blend:
/// `result = original + (convolved - original) * (amount - 1)`.
///
/// Edge pixels skip out-of-bounds taps; the accumulated value is divided by
/// the sum of the in-bounds weights so a uniform region convolves to the
/// center value regardless of position.
pub fn sharpen(buf: &mut PixelBuffer, amount: f32) {
    let src = buf.clone();
    let w = src.width as i64;
    let h = src.height as i64;
    let blend = amount - 1.0;

    for y in 0..src.height {
        for x in 0..src.width {
            let mut acc = [0.0f32; 3];
            let mut weight_sum = 0.0f32;

            for (ky, row) in KERNEL.iter().enumerate() {
                for (kx, &wt) in row.iter().enumerate() {
                    let nx = x as i64 + kx as i64 - 1;
                    let ny = y as i64 + ky as i64 - 1;
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let px = src.get(nx as u32, ny as u32);
                    for c in 0..3 {
                        acc[c] += px[c] as f32 * wt;
                    }
                    weight_sum += wt;
                }
            }

            let original = src.get(x, y);
            let mut out = original;
            for c in 0..3 {
                let convolved = acc[c] / weight_sum;
                out[c] = clamp_to_byte(original[c] as f32 + (convolved - original[c] as f32) * blend);
            }
            buf.set(x, y, out);
        }
    }
}
