//! Plain-text metadata sidecar.
//!
//! One `"<Label> = <value>"` per line. Weight min/max and median are computed
//! but only reported on the console, not written here.

use std::fmt::Write as _;
use std::path::Path;

use tracing::debug;

use crate::core::{format_value, Statistics};
use crate::util::Result;

pub const LABEL_COUNT: &str = "Number of points";
pub const LABEL_MIN_X: &str = "Min X";
pub const LABEL_MAX_X: &str = "Max X";
pub const LABEL_MIN_Y: &str = "Min Y";
pub const LABEL_MAX_Y: &str = "Max Y";
pub const LABEL_MIN_Z: &str = "Min Z";
pub const LABEL_MAX_Z: &str = "Max Z";
pub const LABEL_MEAN_WEIGHT: &str = "Mean weight";

/// Render the sidecar text for `stats`.
pub fn sidecar_text(stats: &Statistics) -> String {
    let b = &stats.bounds;
    let values = [
        (LABEL_MIN_X, b.min.x),
        (LABEL_MAX_X, b.max.x),
        (LABEL_MIN_Y, b.min.y),
        (LABEL_MAX_Y, b.max.y),
        (LABEL_MIN_Z, b.min.z),
        (LABEL_MAX_Z, b.max.z),
        (LABEL_MEAN_WEIGHT, stats.weight_mean),
    ];

    let mut out = format!("{LABEL_COUNT} = {}\n", stats.count);
    for (label, value) in values {
        let _ = writeln!(out, "{label} = {}", format_value(value));
    }
    out
}

/// Write the sidecar for `stats` to `path`.
pub fn write_metadata(path: impl AsRef<Path>, stats: &Statistics) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, sidecar_text(stats))?;
    debug!("Wrote metadata to {}", path.display());
    Ok(())
}

/// Parse sidecar text back into `(label, value)` pairs, in file order.
///
/// Lines without a `" = "` separator are ignored.
pub fn parse_sidecar(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| line.split_once(" = "))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}
