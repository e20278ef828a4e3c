//! Refinement pipeline
//!
//! Runs the filter chain in a fixed, preset-driven order over one exclusively
//! owned pixel buffer. Stages whose governing parameter is absent or inert
//! are skipped; once decoding succeeds, no stage can fail.

use crate::buffer::PixelBuffer;
use crate::decoders::decode_image;
use crate::encoders::encode_png;
use crate::error::RefineError;
use crate::filters::{composite, detail, geometry, sharpen, tonal};
use crate::models::{ColorGrade, Preset, RefineOptions};
use crate::presets;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Result of a refine call
#[derive(Debug, Clone)]
pub struct Refined {
    /// Losslessly encoded PNG output, same pixel dimensions as the input
    pub bytes: Vec<u8>,

    /// Non-fatal warnings (currently only unknown-preset fallback)
    pub warnings: Vec<String>,
}

/// Refine encoded image bytes with the named preset.
///
/// The single entry point consumed by the generation orchestrator: decode,
/// resolve the preset (falling back to `clean` with a warning for unknown
/// names), run the filter chain, re-encode. Decode failures abort before any
/// mutation; nothing after a successful decode can fail except the
/// practically unreachable encode error.
pub fn refine(
    encoded: &[u8],
    preset_name: &str,
    options: &RefineOptions,
) -> Result<Refined, RefineError> {
    let mut buffer = decode_image(encoded)?;

    let resolved = presets::resolve(preset_name);
    let mut warnings = Vec::new();
    if let Some(warning) = resolved.warning {
        crate::verbose_println!("[PRESET] {}", warning);
        warnings.push(warning);
    }

    refine_buffer(&mut buffer, &resolved.preset, options);

    Ok(Refined {
        bytes: encode_png(&buffer)?,
        warnings,
    })
}

/// Run the full filter chain over a decoded buffer, in place.
///
/// Stage order is fixed: geometry, tonal, frequency separation, sharpen,
/// compositing. Within the compositing family: tints, grade, grain, vignette.
pub fn refine_buffer(buffer: &mut PixelBuffer, preset: &Preset, options: &RefineOptions) {
    if let Some(amount) = nonzero(preset.lens_distortion) {
        *buffer = geometry::lens_distortion(buffer, amount);
        debug_stats(options, buffer, "lens distortion");
    }

    if let Some(amount) = nonzero(preset.chromatic_aberration) {
        *buffer = geometry::chromatic_aberration(buffer, amount);
        debug_stats(options, buffer, "chromatic aberration");
    }

    if let Some(lift) = nonzero(preset.shadow_lift) {
        tonal::shadow_lift(buffer, lift);
        debug_stats(options, buffer, "shadow lift");
    }

    if let Some(amount) = nonzero(preset.highlight_recovery) {
        tonal::highlight_recovery(buffer, amount);
        debug_stats(options, buffer, "highlight recovery");
    }

    // The tone curve always runs; contrast 1.0 still applies a k=4 S-curve
    tonal::tone_curve(buffer, preset.contrast);
    debug_stats(options, buffer, "tone curve");

    tonal::color_balance(buffer, preset.brightness, preset.vibrance, preset.saturation);
    debug_stats(options, buffer, "color balance");

    if let Some(amount) = preset.micro_contrast {
        detail::micro_contrast(buffer, amount);
        debug_stats(options, buffer, "micro-contrast");
    }

    if let Some(amount) = preset.clarity_boost {
        detail::clarity(buffer, amount);
        debug_stats(options, buffer, "clarity");
    }

    sharpen::sharpen(buffer, preset.sharpen);
    debug_stats(options, buffer, "sharpen");

    composite::zone_tints(buffer, preset.shadow_tint, preset.highlight_tint);
    if preset.color_grade != ColorGrade::None {
        composite::color_grade(buffer, preset.color_grade);
        debug_stats(options, buffer, "color grade");
    }

    if preset.film_grain {
        let mut rng = match options.grain_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        composite::film_grain(buffer, &mut rng);
        debug_stats(options, buffer, "film grain");
    }

    if preset.vignette {
        composite::vignette(buffer);
        debug_stats(options, buffer, "vignette");
    }
}

fn nonzero(value: Option<f32>) -> Option<f32> {
    value.filter(|v| *v != 0.0)
}

/// Print min/max/mean of the RGB channels after a stage
fn debug_stats(options: &RefineOptions, buffer: &PixelBuffer, stage: &str) {
    if !options.debug {
        return;
    }

    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum = 0u64;
    let mut count = 0u64;

    for px in buffer.data.chunks_exact(4) {
        for &v in &px[..3] {
            min = min.min(v);
            max = max.max(v);
            sum += v as u64;
            count += 1;
        }
    }

    let mean = if count > 0 {
        sum as f64 / count as f64
    } else {
        0.0
    };
    eprintln!(
        "[DEBUG] After {} - min: {}, max: {}, mean: {:.2}",
        stage, min, max, mean
    );
}
