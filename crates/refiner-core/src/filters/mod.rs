//! Filter stages of the refinement pipeline
//!
//! Each submodule owns one family of stages. Every stage takes the buffer
//! produced by the previous stage and leaves all channel bytes in [0,255];
//! stages are skipped entirely when their governing preset parameter is
//! absent or at its inert value.

pub mod blur;
pub mod composite;
pub mod detail;
pub mod geometry;
pub mod sharpen;
pub mod tonal;
