//! Data models for the refiner
//!
//! Core data structures for look presets and refinement options.

use serde::{Deserialize, Serialize};

/// A named "look" preset controlling every filter stage of the pipeline.
///
/// All fields are optional in the YAML representation and default to values
/// that leave the corresponding stage inert (multiplicative factors default to
/// 1.0, optional amounts to absent, toggles to off). The tone curve is the one
/// exception: it always runs, even at `contrast = 1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Preset name (e.g. "cinematic")
    pub name: String,

    /// Convolution sharpen blend factor (1.0 = identity)
    #[serde(default = "default_one")]
    pub sharpen: f32,

    /// Tone curve steepness factor; k = (contrast - 1) * 10 + 4
    #[serde(default = "default_one")]
    pub contrast: f32,

    /// Saturation multiplier around the per-pixel average
    #[serde(default = "default_one")]
    pub saturation: f32,

    /// Brightness multiplier
    #[serde(default = "default_one")]
    pub brightness: f32,

    /// Vibrance amount; values above 1.0 pull muted channels toward the
    /// per-pixel maximum
    #[serde(default = "default_one")]
    pub vibrance: f32,

    /// Additive shadow lift on the 0-255 scale, applied below luminance 80
    #[serde(default)]
    pub shadow_lift: Option<f32>,

    /// Additive highlight recovery on the 0-255 scale, applied above
    /// luminance 180 (negative values darken)
    #[serde(default)]
    pub highlight_recovery: Option<f32>,

    /// Midtone-only detail gain (frequency separation, sigma 5)
    #[serde(default)]
    pub clarity_boost: Option<f32>,

    /// Global fine detail gain (frequency separation, sigma 2)
    #[serde(default)]
    pub micro_contrast: Option<f32>,

    /// Chromatic aberration amount (0.0-1.0)
    #[serde(default)]
    pub chromatic_aberration: Option<f32>,

    /// Radial lens distortion correction amount (0.0-1.0)
    #[serde(default)]
    pub lens_distortion: Option<f32>,

    /// Darken corners with a radial multiply gradient
    #[serde(default)]
    pub vignette: bool,

    /// Add per-pixel random noise in [-5, +5]
    #[serde(default)]
    pub film_grain: bool,

    /// Stylized color-grade overlay
    #[serde(default)]
    pub color_grade: ColorGrade,

    /// Color blended into shadows (luminance < 80), max 10% strength
    #[serde(default)]
    pub shadow_tint: Option<Tint>,

    /// Color blended into highlights (luminance > 200), max 5% strength
    #[serde(default)]
    pub highlight_tint: Option<Tint>,
}

fn default_one() -> f32 {
    1.0
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            name: String::new(),
            sharpen: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            brightness: 1.0,
            vibrance: 1.0,
            shadow_lift: None,
            highlight_recovery: None,
            clarity_boost: None,
            micro_contrast: None,
            chromatic_aberration: None,
            lens_distortion: None,
            vignette: false,
            film_grain: false,
            color_grade: ColorGrade::None,
            shadow_tint: None,
            highlight_tint: None,
        }
    }
}

/// Stylized color-grade overlay applied near the end of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ColorGrade {
    /// No overlay
    #[default]
    None,

    /// Cyan-ish overlay plus an orange highlight pass
    TealOrange,

    /// Warm near-white wash
    Natural,

    /// Reserved; currently a no-op (the preset's saturation carries the look)
    Vibrant,
}

impl std::str::FromStr for ColorGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "teal-orange" | "tealorange" => Ok(Self::TealOrange),
            "natural" => Ok(Self::Natural),
            "vibrant" => Ok(Self::Vibrant),
            _ => Err(format!("Unknown color grade: {}", s)),
        }
    }
}

/// A flat RGB color used for shadow/highlight tinting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Per-call options for the refinement pipeline
#[derive(Debug, Clone, Default)]
pub struct RefineOptions {
    /// Seed for the film grain RNG. When `None`, grain is seeded from entropy;
    /// tests pin a seed to make the noise bound assertable.
    pub grain_seed: Option<u64>,

    /// Print per-stage min/max/mean statistics to stderr
    pub debug: bool,
}
