//! Summary statistics over a finalized record set.

use std::fmt;

use crate::core::record::RecordSet;
use crate::util::BBox3f;

/// Descriptive statistics of the accepted records.
///
/// Everything here is computed over the filtered set, never the raw source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Statistics {
    /// Number of records.
    pub count: usize,
    /// Per-axis minimum and maximum.
    pub bounds: BBox3f,
    pub weight_min: f32,
    pub weight_max: f32,
    pub weight_mean: f32,
    pub weight_median: f32,
}

impl Statistics {
    /// Compute statistics; `None` for an empty set.
    pub fn compute(records: &RecordSet) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let mut weights: Vec<f32> = records.iter().map(|r| r.weight).collect();
        let sum: f64 = weights.iter().map(|&w| w as f64).sum();
        let (weight_min, weight_max) = weights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &w| (lo.min(w), hi.max(w)));

        Some(Self {
            count: records.len(),
            bounds: records.bounds(),
            weight_min,
            weight_max,
            weight_mean: (sum / weights.len() as f64) as f32,
            weight_median: median(&mut weights),
        })
    }
}

/// Median of a non-empty slice; even lengths average the two middle values.
fn median(values: &mut [f32]) -> f32 {
    values.sort_by(f32::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        ((values[mid - 1] as f64 + values[mid] as f64) / 2.0) as f32
    } else {
        values[mid]
    }
}

/// Format a float the way the sidecar expects: shortest round-trip digits,
/// integral values keep a trailing `.0`.
pub fn format_value<T: fmt::Debug>(v: T) -> String {
    format!("{v:?}")
}
