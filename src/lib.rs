//! # pointpack
//!
//! Packs astrophysical point data into the flat float32 point clouds read by
//! the volume renderer, plus a plain-text metadata sidecar.
//!
//! Supported sources are halo-finder catalogs, spherical galaxy surveys, OBJ
//! mesh vertices and synthetic distributions (regular grid, uniform random,
//! jittered plane).
//!
//! ## Modules
//!
//! - [`util`] - Errors, bounds, random sampling
//! - [`core`] - Point record, record set, statistics
//! - [`source`] - Per-format source readers
//! - [`transform`] - Coordinate conversion and weight rules
//! - [`filter`] - Threshold, region-of-interest and subsampling filters
//! - [`output`] - Binary point file and metadata sidecar
//! - [`pipeline`] - Configuration and end-to-end runs
//!
//! ## Example
//!
//! ```ignore
//! use pointpack::prelude::*;
//!
//! let mut config = PipelineConfig::halo_catalog("rockstar/out_66.list");
//! config.roi_edge = Some(128.0);
//! match pointpack::pipeline::run(&config)? {
//!     Outcome::Written(report) => println!("{} points", report.stats.count),
//!     Outcome::Empty(_) => println!("nothing selected"),
//! }
//! ```

pub mod util;
pub mod core;
pub mod source;
pub mod transform;
pub mod filter;
pub mod output;
pub mod pipeline;

// HDR -> PFM conversion (enabled with "hdr" feature)
#[cfg(feature = "hdr")]
pub mod hdr;

// Re-export commonly used types
pub use crate::util::{Error, ErrorKind, Result};
pub use crate::core::{PointRecord, RecordSet, Statistics};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, ErrorKind, Result, Sampler};
    pub use crate::core::{PointRecord, RecordSet, Statistics};
    pub use crate::source::Delimiter;
    pub use crate::transform::WeightRule;
    pub use crate::filter::FilterChain;
    pub use crate::pipeline::{Outcome, PackReport, PipelineConfig, SourceFormat};
}
