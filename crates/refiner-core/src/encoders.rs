//! Image encoder for refined output
//!
//! Output is always lossless 8-bit RGBA PNG so that a decode -> encode ->
//! decode round trip is pixel-identical. The caller owns persistence; this
//! module only produces bytes.

use crate::buffer::PixelBuffer;
use crate::error::RefineError;

/// Encode a pixel buffer as a lossless RGBA PNG
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, RefineError> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(RefineError::Encode("image has zero dimension".to_string()));
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, buffer.width, buffer.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RefineError::Encode(format!("Failed to write PNG header: {}", e)))?;
        writer
            .write_image_data(&buffer.data)
            .map_err(|e| RefineError::Encode(format!("Failed to write PNG data: {}", e)))?;
    }

    Ok(out)
}
