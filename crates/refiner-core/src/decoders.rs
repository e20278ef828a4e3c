//! Image decoders for encoded input bytes
//!
//! The refiner receives already-generated images as raw encoded bytes, so the
//! format is sniffed from magic numbers rather than file extensions. PNG and
//! TIFF are supported; everything decodes to an 8-bit RGBA [`PixelBuffer`].

use crate::buffer::PixelBuffer;
use crate::error::RefineError;
use std::io::Cursor;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Decode encoded image bytes into an RGBA pixel buffer.
///
/// Fails with [`RefineError::Decode`] for unsupported or truncated input; a
/// failure here aborts the refine call before any mutation happens.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, RefineError> {
    if bytes.starts_with(&PNG_MAGIC) {
        decode_png(bytes)
    } else if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        decode_tiff(bytes)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Err(RefineError::Decode(
            "JPEG input is not supported; supply PNG or TIFF".to_string(),
        ))
    } else {
        Err(RefineError::Decode(
            "Unrecognized image format (supported: PNG, TIFF)".to_string(),
        ))
    }
}

/// Decode a PNG from memory
fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, RefineError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Expand palette and sub-byte depths; 16-bit stays 16-bit and is reduced
    // below by taking the high byte.
    decoder.set_transformations(png::Transformations::EXPAND);

    let mut reader = decoder
        .read_info()
        .map_err(|e| RefineError::Decode(format!("Failed to read PNG header: {}", e)))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| RefineError::Decode(format!("Failed to read PNG image data: {}", e)))?;
    let data = &buf[..info.buffer_size()];

    let (width, height) = (info.width, info.height);
    let pixel_count = (width as usize) * (height as usize);

    let rgba = match (info.color_type, info.bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => expand_to_rgba(data, 1),
        (png::ColorType::Grayscale, png::BitDepth::Sixteen) => {
            expand_to_rgba(&high_bytes(data), 1)
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => expand_to_rgba(data, 2),
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Sixteen) => {
            expand_to_rgba(&high_bytes(data), 2)
        }
        (png::ColorType::Rgb, png::BitDepth::Eight) => expand_to_rgba(data, 3),
        (png::ColorType::Rgb, png::BitDepth::Sixteen) => expand_to_rgba(&high_bytes(data), 3),
        (png::ColorType::Rgba, png::BitDepth::Eight) => data.to_vec(),
        (png::ColorType::Rgba, png::BitDepth::Sixteen) => high_bytes(data),
        (color, depth) => {
            return Err(RefineError::Decode(format!(
                "Unsupported PNG format: {:?} at {:?} bits",
                color, depth
            )))
        }
    };

    if rgba.len() != pixel_count * 4 {
        return Err(RefineError::Decode(format!(
            "PNG data length mismatch: got {} bytes for {}x{}",
            rgba.len(),
            width,
            height
        )));
    }

    Ok(PixelBuffer::from_rgba(width, height, rgba))
}

/// Decode a TIFF from memory
fn decode_tiff(bytes: &[u8]) -> Result<PixelBuffer, RefineError> {
    let mut decoder = tiff::decoder::Decoder::new(Cursor::new(bytes))
        .map_err(|e| RefineError::Decode(format!("Failed to create TIFF decoder: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| RefineError::Decode(format!("Failed to get TIFF dimensions: {}", e)))?;

    let color_type = decoder
        .colortype()
        .map_err(|e| RefineError::Decode(format!("Failed to get TIFF color type: {}", e)))?;

    let channels = match color_type {
        tiff::ColorType::Gray(_) => 1,
        tiff::ColorType::GrayA(_) => 2,
        tiff::ColorType::RGB(_) => 3,
        tiff::ColorType::RGBA(_) => 4,
        other => {
            return Err(RefineError::Decode(format!(
                "Unsupported TIFF color type: {:?}",
                other
            )))
        }
    };

    let image_data = decoder
        .read_image()
        .map_err(|e| RefineError::Decode(format!("Failed to read TIFF image data: {}", e)))?;

    let bytes8: Vec<u8> = match image_data {
        tiff::decoder::DecodingResult::U8(v) => v,
        tiff::decoder::DecodingResult::U16(v) => v.iter().map(|&s| (s >> 8) as u8).collect(),
        other => {
            return Err(RefineError::Decode(format!(
                "Unsupported TIFF sample format: {:?}",
                other
            )))
        }
    };

    let pixel_count = (width as usize) * (height as usize);
    if bytes8.len() != pixel_count * channels {
        return Err(RefineError::Decode(format!(
            "TIFF data length mismatch: got {} samples for {}x{} with {} channels",
            bytes8.len(),
            width,
            height,
            channels
        )));
    }

    Ok(PixelBuffer::from_rgba(
        width,
        height,
        expand_to_rgba(&bytes8, channels),
    ))
}

/// Take the high byte of big-endian 16-bit samples
fn high_bytes(data: &[u8]) -> Vec<u8> {
    data.iter().step_by(2).copied().collect()
}

/// Expand gray / gray+alpha / RGB samples into interleaved RGBA
fn expand_to_rgba(data: &[u8], channels: usize) -> Vec<u8> {
    match channels {
        4 => data.to_vec(),
        3 => {
            let mut out = Vec::with_capacity(data.len() / 3 * 4);
            for px in data.chunks_exact(3) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            out
        }
        2 => {
            let mut out = Vec::with_capacity(data.len() * 2);
            for px in data.chunks_exact(2) {
                out.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
            }
            out
        }
        1 => {
            let mut out = Vec::with_capacity(data.len() * 4);
            for &g in data {
                out.extend_from_slice(&[g, g, g, 255]);
            }
            out
        }
        n => unreachable!("unexpected channel count {}", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoders::encode_png;

    fn gradient_buffer(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buf.set(
                    x,
                    y,
                    [
                        (x * 13 % 256) as u8,
                        (y * 29 % 256) as u8,
                        ((x + y) * 7 % 256) as u8,
                        255,
                    ],
                );
            }
        }
        buf
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_image(&[0u8; 32]).unwrap_err();
        assert!(err.to_string().contains("Unrecognized image format"));
    }

    #[test]
    fn test_decode_rejects_jpeg_with_hint() {
        let err = decode_image(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]).unwrap_err();
        assert!(err.to_string().contains("JPEG"));
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        let buf = gradient_buffer(16, 16);
        let encoded = encode_png(&buf).unwrap();
        let err = decode_image(&encoded[..encoded.len() / 2]).unwrap_err();
        assert!(matches!(err, RefineError::Decode(_)));
    }

    #[test]
    fn test_decode_png_roundtrip() {
        let buf = gradient_buffer(23, 11);
        let encoded = encode_png(&buf).unwrap();
        let decoded = decode_image(&encoded).unwrap();
        assert_eq!(decoded, buf);
    }

    #[test]
    fn test_decode_gray_png_expands_to_rgba() {
        // Write an 8-bit grayscale PNG by hand
        let mut encoded = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut encoded, 2, 2);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 85, 170, 255]).unwrap();
        }

        let decoded = decode_image(&encoded).unwrap();
        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.height, 2);
        assert_eq!(decoded.get(1, 0), [85, 85, 85, 255]);
        assert_eq!(decoded.get(1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn test_decode_rgb16_png_takes_high_byte() {
        let mut encoded = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut encoded, 1, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Sixteen);
            let mut writer = encoder.write_header().unwrap();
            // Big-endian 16-bit samples: 0x1234, 0xFF00, 0x0001
            writer
                .write_image_data(&[0x12, 0x34, 0xFF, 0x00, 0x00, 0x01])
                .unwrap();
        }

        let decoded = decode_image(&encoded).unwrap();
        assert_eq!(decoded.get(0, 0), [0x12, 0xFF, 0x00, 255]);
    }

    #[test]
    fn test_decode_tiff_rgb() {
        let mut encoded = Cursor::new(Vec::new());
        {
            let mut encoder = tiff::encoder::TiffEncoder::new(&mut encoded).unwrap();
            encoder
                .write_image::<tiff::encoder::colortype::RGB8>(2, 1, &[10, 20, 30, 40, 50, 60])
                .unwrap();
        }

        let decoded = decode_image(encoded.get_ref()).unwrap();
        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.get(0, 0), [10, 20, 30, 255]);
        assert_eq!(decoded.get(1, 0), [40, 50, 60, 255]);
    }
}
