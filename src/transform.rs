//! Per-record coordinate conversion and weight derivation.
//!
//! Every function here is pure. Arithmetic is done in `f64` and narrowed to
//! `f32` when the record is built.

use serde::{Deserialize, Serialize};

use crate::core::PointRecord;
use crate::source::{HaloRow, SurveyRow, VertexRow};
use crate::util::DVec3;

/// Mass unit rescale keeping weights in a range the renderer handles well.
pub const MASS_UNIT: f64 = 1.0e12;

/// How a record's weight is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightRule {
    /// Linear mass column divided by [`MASS_UNIT`].
    Mass,
    /// `10^value / MASS_UNIT` from a log10 mass column.
    LogMass,
    /// Constant 1.0.
    #[default]
    Uniform,
    /// Fraction of the box along the warped axis (`z / scale`) when the
    /// distribution bias exceeds 1, otherwise 1.0.
    AxisFraction,
    /// Sum of the three per-vertex colour channels.
    ColorSum,
}

impl WeightRule {
    /// Weight from a mass-like source value. Rules without a mass input give 1.0.
    pub fn mass_weight(self, value: f64) -> f64 {
        match self {
            WeightRule::Mass => value / MASS_UNIT,
            WeightRule::LogMass => 10f64.powf(value) / MASS_UNIT,
            _ => 1.0,
        }
    }
}

/// A transformed record before filtering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub record: PointRecord,
    /// Value compared against the threshold filter.
    pub key: f64,
}

impl Candidate {
    fn new(position: DVec3, weight: f64, key: f64) -> Self {
        Self {
            record: PointRecord::from_position(position.as_vec3(), weight as f32),
            key,
        }
    }
}

/// Spherical survey coordinates to Cartesian.
///
/// Declination is measured from the equator, so the polar angle is
/// `90° - declination`.
pub fn spherical_to_cartesian(azimuth_deg: f64, declination_deg: f64, radius: f64) -> DVec3 {
    let azimuth = azimuth_deg.to_radians();
    let polar = (90.0 - declination_deg).to_radians();
    let (sin_p, cos_p) = polar.sin_cos();
    let (sin_a, cos_a) = azimuth.sin_cos();
    DVec3::new(radius * sin_p * cos_a, radius * sin_p * sin_a, radius * cos_p)
}

/// Modeling-tool (y-up) vertex to renderer axes with a uniform scale.
#[inline]
pub fn mesh_remap(v: DVec3, scale: f64) -> DVec3 {
    DVec3::new(scale * v.x, scale * v.z, -scale * v.y)
}

/// Power-law warp of a unit coordinate, used to build density gradients.
#[inline]
pub fn biased(t: f64, bias: f64) -> f64 {
    t.powf(bias)
}

/// Halo: Cartesian passthrough; the threshold applies to the derived weight.
pub fn halo(row: &HaloRow, rule: WeightRule) -> Candidate {
    let weight = rule.mass_weight(row.mass);
    Candidate::new(row.position, weight, weight)
}

/// Survey object: spherical conversion; the threshold applies to the raw
/// log-mass column.
pub fn survey(row: &SurveyRow, rule: WeightRule) -> Candidate {
    let position = spherical_to_cartesian(row.azimuth, row.declination, row.radius);
    Candidate::new(position, rule.mass_weight(row.log_mass), row.log_mass)
}

/// Mesh vertex: axis remap and scale.
pub fn vertex(row: &VertexRow, scale: f64, rule: WeightRule) -> Candidate {
    let weight = match (rule, row.color) {
        (WeightRule::ColorSum, Some(c)) => c.x + c.y + c.z,
        _ => 1.0,
    };
    Candidate::new(mesh_remap(row.position, scale), weight, weight)
}

/// Synthetic point from unit coordinates `u` in `[0, 1]^3`; `z` is warped by
/// `bias` before scaling to the box.
pub fn synthetic(u: DVec3, scale: f64, bias: f64, rule: WeightRule) -> Candidate {
    let z = scale * biased(u.z, bias);
    let weight = match rule {
        WeightRule::AxisFraction if bias > 1.0 => z / scale,
        _ => 1.0,
    };
    Candidate::new(DVec3::new(scale * u.x, scale * u.y, z), weight, weight)
}
