//! Utility types shared by every pipeline stage.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - [`BBox3f`] and math type re-exports from glam
//! - [`Sampler`] - seeded or entropy-backed uniform draws

mod error;
mod math;
mod sampler;

pub use error::*;
pub use math::*;
pub use sampler::*;
