//! RGBA pixel buffer and shared per-pixel math
//!
//! Every filter stage mutates a `PixelBuffer` in place (or builds a fresh one
//! from a source buffer) and must leave each channel byte in [0,255]. All
//! float-to-byte writebacks go through [`clamp_to_byte`] so no stage can hand
//! out-of-range values to the next.

/// Decoded RGBA image data, channel order R,G,B,A, one byte per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Interleaved RGBA bytes, length `width * height * 4`
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-initialized (transparent black) buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Wrap existing RGBA bytes. Panics if the length does not match the
    /// dimensions; decoders are responsible for handing over exact buffers.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 4,
            "RGBA data length does not match {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Byte offset of the pixel at (x, y)
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Read the pixel at (x, y)
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Write the pixel at (x, y)
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Read the pixel at integer coordinates clamped into bounds
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.get(cx, cy)
    }

    /// Bilinearly sample all four channels at fractional coordinates.
    ///
    /// Returns `None` when the coordinate falls outside
    /// `[0, width-1] x [0, height-1]`; callers decide the edge policy.
    pub fn sample_bilinear(&self, fx: f32, fy: f32) -> Option<[f32; 4]> {
        if fx < 0.0 || fy < 0.0 || fx > (self.width - 1) as f32 || fy > (self.height - 1) as f32 {
            return None;
        }

        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let p00 = self.get(x0, y0);
        let p10 = self.get(x1, y0);
        let p01 = self.get(x0, y1);
        let p11 = self.get(x1, y1);

        let mut out = [0.0f32; 4];
        for c in 0..4 {
            let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
            let bottom = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
            out[c] = top * (1.0 - ty) + bottom * ty;
        }
        Some(out)
    }
}

/// Round and clamp a float channel value into a byte.
#[inline]
pub fn clamp_to_byte(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Weighted brightness estimate used to gate shadow/highlight adjustments.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent_black() {
        let buf = PixelBuffer::new(3, 2);
        assert_eq!(buf.data.len(), 24);
        assert!(buf.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.set(2, 3, [10, 20, 30, 255]);
        assert_eq!(buf.get(2, 3), [10, 20, 30, 255]);
    }

    #[test]
    fn test_clamp_to_byte() {
        assert_eq!(clamp_to_byte(-4.2), 0);
        assert_eq!(clamp_to_byte(0.4), 0);
        assert_eq!(clamp_to_byte(127.5), 128);
        assert_eq!(clamp_to_byte(255.0), 255);
        assert_eq!(clamp_to_byte(300.0), 255);
    }

    #[test]
    fn test_luminance_weights() {
        assert_eq!(luminance(255, 255, 255), 255.0);
        assert_eq!(luminance(0, 0, 0), 0.0);
        assert!((luminance(255, 0, 0) - 76.245).abs() < 1e-3);
    }

    #[test]
    fn test_bilinear_sample_exact_and_midpoint() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.set(0, 0, [0, 0, 0, 255]);
        buf.set(1, 0, [100, 200, 50, 255]);

        let exact = buf.sample_bilinear(1.0, 0.0).unwrap();
        assert_eq!(exact, [100.0, 200.0, 50.0, 255.0]);

        let mid = buf.sample_bilinear(0.5, 0.0).unwrap();
        assert_eq!(mid, [50.0, 100.0, 25.0, 255.0]);
    }

    #[test]
    fn test_bilinear_sample_out_of_bounds() {
        let buf = PixelBuffer::new(2, 2);
        assert!(buf.sample_bilinear(-0.1, 0.0).is_none());
        assert!(buf.sample_bilinear(0.0, 1.01).is_none());
    }
}
