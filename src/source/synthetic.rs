//! Synthetic point distributions for renderer testing.
//!
//! Three variants share the same bias/weight rule:
//! a deterministic regular grid, independent uniform draws, and a jittered
//! plane that reads 2D points from a file and draws the third axis.

use crate::source::text::{Delimiter, Row, SourceRow, TextTable};
use crate::transform::{self, Candidate, WeightRule};
use crate::util::{DVec3, Error, Result, Sampler};

/// Column map `[x, y]` of a jittered-plane file.
pub const PLANE_COLUMNS: [usize; 2] = [0, 1];

pub const PLANE_DELIMITER: Delimiter = Delimiter::Whitespace;

/// Default box edge length.
pub const DEFAULT_BOX_SIZE: f64 = 100.0;

/// Default power-law exponent applied to `z`.
pub const DEFAULT_BIAS: f64 = 3.0;

/// Shape shared by all synthetic generators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Distribution {
    /// Edge length of the generated box.
    pub box_size: f64,
    /// Exponent warping the `z` axis.
    pub bias: f64,
    pub weight: WeightRule,
}

impl Default for Distribution {
    fn default() -> Self {
        Self {
            box_size: DEFAULT_BOX_SIZE,
            bias: DEFAULT_BIAS,
            weight: WeightRule::AxisFraction,
        }
    }
}

impl Distribution {
    #[inline]
    fn point(&self, u: DVec3) -> Candidate {
        transform::synthetic(u, self.box_size, self.bias, self.weight)
    }
}

/// A 2D point of a jittered-plane file, both coordinates in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneRow {
    pub x: f64,
    pub y: f64,
}

impl SourceRow for PlaneRow {
    const COLUMNS: usize = 2;

    fn from_row(row: &Row<'_>, columns: &[usize]) -> Result<Self> {
        Ok(Self {
            x: row.number(columns[0])?,
            y: row.number(columns[1])?,
        })
    }
}

/// Points per dimension for a requested total, rounded to the nearest cube.
pub fn grid_dim(count: usize) -> usize {
    (0.5 + (count as f64).cbrt()) as usize
}

/// Regular grid of `grid_dim(count)^3` points, x-major traversal.
///
/// Output is fully deterministic.
pub fn regular_grid(count: usize, dist: &Distribution) -> Result<Vec<Candidate>> {
    let n = grid_dim(count);
    if n < 2 {
        return Err(Error::config(format!(
            "regular grid needs at least 2 points per dimension, {count} points give {n}"
        )));
    }
    let step = 1.0 / (n - 1) as f64;

    let mut out = Vec::with_capacity(n * n * n);
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let u = DVec3::new(i as f64 * step, j as f64 * step, k as f64 * step);
                out.push(dist.point(u));
            }
        }
    }
    Ok(out)
}

/// `count` independent uniform points.
pub fn uniform_random(count: usize, dist: &Distribution, sampler: &mut Sampler) -> Vec<Candidate> {
    (0..count)
        .map(|_| {
            let u = DVec3::new(sampler.unit(), sampler.unit(), sampler.unit());
            dist.point(u)
        })
        .collect()
}

/// Plane points from `table` with a random, warped `z`.
pub fn jittered_plane(
    table: &TextTable,
    columns: &[usize],
    dist: &Distribution,
    sampler: &mut Sampler,
) -> Result<Vec<Candidate>> {
    table
        .parse::<PlaneRow>(columns)
        .map(|row| {
            let row = row?;
            Ok(dist.point(DVec3::new(row.x, row.y, sampler.unit())))
        })
        .collect()
}
