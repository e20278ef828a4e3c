//! Error taxonomy for the refinement pipeline.
//!
//! Decode failures are the only expected fatal error: once a buffer decodes,
//! every filter stage is clamped arithmetic and cannot fail. Encode failures
//! are kept as a separate variant for completeness but are practically
//! unreachable for a well-formed buffer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefineError {
    /// Input bytes are not a supported raster format or are truncated.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Re-encoding a well-formed buffer failed (internal error).
    #[error("failed to encode image: {0}")]
    Encode(String),
}
