//! Separable box-blur approximation of Gaussian blur
//!
//! Three cascaded box blurs with sizes from the standard box-size formula
//! approximate a Gaussian without per-pixel exponential weighting. Each box
//! pass runs horizontally then vertically, with edge samples replicated.
//! The cascade is order-sensitive; swapping in a true Gaussian kernel would
//! change pixel output.

use crate::buffer::PixelBuffer;

/// Number of cascaded box passes
const PASSES: usize = 3;

/// Box sizes (always odd) approximating a Gaussian of the given sigma.
pub fn boxes_for_gauss(sigma: f32, n: usize) -> Vec<usize> {
    let n_f = n as f32;
    let w_ideal = (12.0 * sigma * sigma / n_f + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i32;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wu = wl + 2;

    let m_ideal = (12.0 * sigma * sigma
        - n_f * (wl * wl) as f32
        - 4.0 * n_f * wl as f32
        - 3.0 * n_f)
        / (-4.0 * wl as f32 - 4.0);
    let m = m_ideal.round() as i32;

    (0..n as i32)
        .map(|i| if i < m { wl.max(1) as usize } else { wu as usize })
        .collect()
}

/// Blur the RGB channels of `buf`, returning interleaved `[r, g, b]` floats
/// (`pixel_count * 3` values). Alpha is not blurred; detail boosting never
/// touches it.
pub fn gaussian_approx_rgb(buf: &PixelBuffer, sigma: f32) -> Vec<f32> {
    let w = buf.width as usize;
    let h = buf.height as usize;
    let boxes = boxes_for_gauss(sigma, PASSES);

    let mut planes: [Vec<f32>; 3] = [
        Vec::with_capacity(w * h),
        Vec::with_capacity(w * h),
        Vec::with_capacity(w * h),
    ];
    for px in buf.data.chunks_exact(4) {
        planes[0].push(px[0] as f32);
        planes[1].push(px[1] as f32);
        planes[2].push(px[2] as f32);
    }

    let mut scratch = vec![0.0f32; w * h];
    for plane in planes.iter_mut() {
        for &size in &boxes {
            let radius = (size - 1) / 2;
            box_blur_h(plane, &mut scratch, w, h, radius);
            box_blur_v(&scratch, plane, w, h, radius);
        }
    }

    let mut out = Vec::with_capacity(w * h * 3);
    for i in 0..w * h {
        out.push(planes[0][i]);
        out.push(planes[1][i]);
        out.push(planes[2][i]);
    }
    out
}

/// Horizontal box pass with replicated edges
fn box_blur_h(src: &[f32], dst: &mut [f32], w: usize, h: usize, radius: usize) {
    if radius == 0 {
        dst.copy_from_slice(src);
        return;
    }
    let norm = 1.0 / (2 * radius + 1) as f32;
    let r = radius as i64;

    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            let mut acc = 0.0;
            for j in (x as i64 - r)..=(x as i64 + r) {
                let cj = j.clamp(0, w as i64 - 1) as usize;
                acc += src[row + cj];
            }
            dst[row + x] = acc * norm;
        }
    }
}

/// Vertical box pass with replicated edges
fn box_blur_v(src: &[f32], dst: &mut [f32], w: usize, h: usize, radius: usize) {
    if radius == 0 {
        dst.copy_from_slice(src);
        return;
    }
    let norm = 1.0 / (2 * radius + 1) as f32;
    let r = radius as i64;

    for x in 0..w {
        for y in 0..h {
            let mut acc = 0.0;
            for j in (y as i64 - r)..=(y as i64 + r) {
                let cj = j.clamp(0, h as i64 - 1) as usize;
                acc += src[cj * w + x];
            }
            dst[y * w + x] = acc * norm;
        }
    }
}
