//! Refiner Core Library
//!
//! Pixel-level enhancement pipeline for freshly generated images: a named
//! "look" preset drives an ordered chain of numeric filters over an RGBA
//! buffer, producing a polished, losslessly re-encoded output.

pub mod buffer;
pub mod config;
pub mod decoders;
pub mod encoders;
pub mod error;
pub mod filters;
pub mod models;
pub mod pipeline;
pub mod presets;

// Re-export commonly used types
pub use buffer::PixelBuffer;
pub use error::RefineError;
pub use models::{ColorGrade, Preset, RefineOptions, Tint};
pub use pipeline::{refine, Refined};
pub use presets::{resolve, Resolved};
