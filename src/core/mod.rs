//! Record model and summary statistics.
//!
//! - [`PointRecord`] - the fixed `(x, y, z, weight)` record
//! - [`RecordSet`] - accepted records in source order
//! - [`Statistics`] - min/max/mean/median over a record set

mod record;
mod stats;

pub use record::*;
pub use stats::*;
