//! Pipeline configuration.
//!
//! A [`PipelineConfig`] is a plain value: build one from a per-format preset
//! and adjust fields, or load it from JSON. Fields missing from a JSON file
//! take the preset value for the file's `format`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::format_value;
use crate::filter::FilterChain;
use crate::source::{halo, mesh, survey, synthetic, Delimiter, SourceRow};
use crate::source::{HaloRow, PlaneRow, SurveyRow, VertexRow};
use crate::transform::WeightRule;
use crate::util::{Error, Result};

/// Input format of a pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Rockstar-style halo catalog, Cartesian positions.
    HaloCatalog,
    /// Galaxy survey in azimuth/declination/distance.
    SphericalSurvey,
    /// OBJ mesh vertex list.
    ObjMesh,
    /// Deterministic regular grid.
    RegularGrid,
    /// Independent uniform draws.
    UniformRandom,
    /// 2D points from a file plus a random third axis.
    JitteredPlane,
}

impl SourceFormat {
    /// Whether the format reads a source file.
    pub fn reads_file(self) -> bool {
        !matches!(self, SourceFormat::RegularGrid | SourceFormat::UniformRandom)
    }

    /// Whether records come from a generated distribution in a box.
    pub fn is_synthetic(self) -> bool {
        matches!(
            self,
            SourceFormat::RegularGrid | SourceFormat::UniformRandom | SourceFormat::JitteredPlane
        )
    }

    /// Minimum column map length for the format.
    fn min_columns(self) -> usize {
        match self {
            SourceFormat::HaloCatalog => HaloRow::COLUMNS,
            SourceFormat::SphericalSurvey => SurveyRow::COLUMNS,
            SourceFormat::ObjMesh => VertexRow::COLUMNS,
            SourceFormat::JitteredPlane => PlaneRow::COLUMNS,
            SourceFormat::RegularGrid | SourceFormat::UniformRandom => 0,
        }
    }

    fn allows(self, rule: WeightRule) -> bool {
        use WeightRule::*;
        match self {
            SourceFormat::HaloCatalog | SourceFormat::SphericalSurvey => {
                matches!(rule, Mass | LogMass | Uniform)
            }
            SourceFormat::ObjMesh => matches!(rule, Uniform | ColorSum),
            SourceFormat::RegularGrid | SourceFormat::UniformRandom | SourceFormat::JitteredPlane => {
                matches!(rule, Uniform | AxisFraction)
            }
        }
    }
}

/// Everything one packing run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct PipelineConfig {
    pub format: SourceFormat,
    /// Input file; unused by the grid and random generators.
    pub source_path: Option<PathBuf>,
    pub delimiter: Delimiter,
    /// Lines skipped before the first data row.
    pub header_lines: usize,
    /// Format-specific column indices, see the `*_COLUMNS` constants.
    pub column_map: Vec<usize>,
    pub weight_rule: WeightRule,
    /// Strict lower bound on the threshold key; `None` disables the filter.
    pub threshold: Option<f64>,
    /// Region-of-interest cube edge; `None` disables the filter.
    pub roi_edge: Option<f32>,
    /// Mesh scale multiplier, or the box size of synthetic formats.
    pub scale: f64,
    /// Keep one in `factor` records on average; `None` disables sampling.
    pub subsample_factor: Option<f64>,
    /// Power-law exponent on the synthetic `z` axis.
    pub bias_exponent: f64,
    /// Requested number of points for the grid and random generators.
    pub point_count: Option<usize>,
    /// Random seed; `None` draws from system entropy.
    pub seed: Option<u64>,
    /// Directory receiving the `.bin` and `_metadata.txt` files.
    pub output_dir: PathBuf,
    /// Output file stem; derived from the source when absent.
    pub output_name: Option<String>,
}

impl PipelineConfig {
    fn base(format: SourceFormat, source_path: Option<PathBuf>) -> Self {
        Self {
            format,
            source_path,
            delimiter: Delimiter::Whitespace,
            header_lines: 0,
            column_map: Vec::new(),
            weight_rule: WeightRule::Uniform,
            threshold: None,
            roi_edge: None,
            scale: 1.0,
            subsample_factor: None,
            bias_exponent: 1.0,
            point_count: None,
            seed: None,
            output_dir: PathBuf::from("."),
            output_name: None,
        }
    }

    /// Halo catalog: mass threshold 0 and a 256 Mpc/h region of interest.
    pub fn halo_catalog(path: impl Into<PathBuf>) -> Self {
        Self {
            delimiter: halo::HALO_DELIMITER,
            header_lines: halo::HALO_HEADER_LINES,
            column_map: halo::HALO_COLUMNS.to_vec(),
            weight_rule: WeightRule::Mass,
            threshold: Some(0.0),
            roi_edge: Some(256.0),
            ..Self::base(SourceFormat::HaloCatalog, Some(path.into()))
        }
    }

    /// Spherical survey: log-mass threshold 0.
    pub fn spherical_survey(path: impl Into<PathBuf>) -> Self {
        Self {
            delimiter: survey::SURVEY_DELIMITER,
            header_lines: survey::SURVEY_HEADER_LINES,
            column_map: survey::SURVEY_COLUMNS.to_vec(),
            weight_rule: WeightRule::LogMass,
            threshold: Some(0.0),
            ..Self::base(SourceFormat::SphericalSurvey, Some(path.into()))
        }
    }

    /// OBJ mesh: scale 20, keep one vertex in five.
    pub fn obj_mesh(path: impl Into<PathBuf>) -> Self {
        Self {
            delimiter: mesh::MESH_DELIMITER,
            column_map: mesh::MESH_COLUMNS.to_vec(),
            scale: 20.0,
            subsample_factor: Some(5.0),
            ..Self::base(SourceFormat::ObjMesh, Some(path.into()))
        }
    }

    /// Regular grid of about `count` points in a 100-unit box, bias 3.
    pub fn regular_grid(count: usize) -> Self {
        Self {
            point_count: Some(count),
            ..Self::synthetic_base(SourceFormat::RegularGrid, None)
        }
    }

    /// `count` uniform random points in a 100-unit box, bias 3.
    pub fn uniform_random(count: usize) -> Self {
        Self {
            point_count: Some(count),
            ..Self::synthetic_base(SourceFormat::UniformRandom, None)
        }
    }

    /// Jittered plane from a 2D point file, 100-unit box, bias 3.
    pub fn jittered_plane(path: impl Into<PathBuf>) -> Self {
        Self {
            delimiter: synthetic::PLANE_DELIMITER,
            column_map: synthetic::PLANE_COLUMNS.to_vec(),
            ..Self::synthetic_base(SourceFormat::JitteredPlane, Some(path.into()))
        }
    }

    fn synthetic_base(format: SourceFormat, source_path: Option<PathBuf>) -> Self {
        Self {
            weight_rule: WeightRule::AxisFraction,
            scale: synthetic::DEFAULT_BOX_SIZE,
            bias_exponent: synthetic::DEFAULT_BIAS,
            ..Self::base(format, source_path)
        }
    }

    /// Preset for `format` with no source attached.
    pub fn preset(format: SourceFormat) -> Self {
        let mut config = match format {
            SourceFormat::HaloCatalog => Self::halo_catalog(""),
            SourceFormat::SphericalSurvey => Self::spherical_survey(""),
            SourceFormat::ObjMesh => Self::obj_mesh(""),
            SourceFormat::RegularGrid => Self::synthetic_base(format, None),
            SourceFormat::UniformRandom => Self::synthetic_base(format, None),
            SourceFormat::JitteredPlane => Self::jittered_plane(""),
        };
        config.source_path = None;
        config
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::open(e, path))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The filters this configuration activates.
    pub fn filters(&self) -> FilterChain {
        FilterChain {
            threshold: self.threshold,
            roi_edge: self.roi_edge,
            subsample: self.subsample_factor,
        }
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.format.reads_file() && self.source_path.as_ref().map_or(true, |p| p.as_os_str().is_empty()) {
            return Err(Error::config(format!("{:?} needs a source_path", self.format)));
        }
        if self.column_map.len() < self.format.min_columns() {
            return Err(Error::config(format!(
                "{:?} needs {} columns in column_map, got {}",
                self.format,
                self.format.min_columns(),
                self.column_map.len()
            )));
        }
        if !self.format.allows(self.weight_rule) {
            return Err(Error::config(format!(
                "weight rule {:?} does not apply to {:?}",
                self.weight_rule, self.format
            )));
        }
        if self.weight_rule == WeightRule::ColorSum && self.column_map.len() < mesh::MESH_COLOR_COLUMNS.len() {
            return Err(Error::config("color_sum weights need colour columns in column_map"));
        }
        if let Some(factor) = self.subsample_factor {
            if !(factor > 0.0) {
                return Err(Error::config(format!("subsample_factor must be positive, got {factor}")));
            }
        }
        if !self.scale.is_finite() || !self.bias_exponent.is_finite() {
            return Err(Error::config("scale and bias_exponent must be finite"));
        }
        if self.format.is_synthetic() && (self.scale <= 0.0 || self.bias_exponent <= 0.0) {
            return Err(Error::config(format!(
                "{:?} needs a positive scale and bias_exponent, got {} and {}",
                self.format, self.scale, self.bias_exponent
            )));
        }
        match self.format {
            SourceFormat::RegularGrid => {
                let count = self.point_count.ok_or_else(|| Error::config("regular grid needs point_count"))?;
                if synthetic::grid_dim(count) < 2 {
                    return Err(Error::config(format!(
                        "regular grid needs at least 2 points per dimension, got point_count {count}"
                    )));
                }
            }
            SourceFormat::UniformRandom if self.point_count.is_none() => {
                return Err(Error::config("uniform random generator needs point_count"));
            }
            _ => {}
        }
        Ok(())
    }

    /// Output file stem for a run that accepted `count` records.
    pub fn output_stem(&self, count: usize) -> String {
        if let Some(name) = &self.output_name {
            return name.clone();
        }
        let stem = self
            .source_path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bias = format_value(self.bias_exponent);

        match self.format {
            SourceFormat::HaloCatalog => {
                let mut name = match self.source_dir_name() {
                    Some(dir) => format!("{dir}_{stem}"),
                    None => stem,
                };
                if let Some(t) = self.threshold {
                    name.push_str(&format!("t={}", format_value(t)));
                }
                if let Some(roi) = self.roi_edge {
                    name.push_str(&format!("roi={}", format_value(roi)));
                }
                name
            }
            SourceFormat::SphericalSurvey => match self.threshold {
                Some(t) => format!("{stem}_t={}", format_value(t)),
                None => stem,
            },
            SourceFormat::ObjMesh => format!("{stem}_n={count}"),
            SourceFormat::RegularGrid => format!("regular_{count}_3d_bias={bias}"),
            SourceFormat::UniformRandom => format!("random_{count}_3d_bias={bias}"),
            SourceFormat::JitteredPlane => format!("{stem}_3d_bias={bias}"),
        }
    }

    fn source_dir_name(&self) -> Option<String> {
        let parent = self.source_path.as_deref()?.parent()?;
        let name = parent.file_name()?;
        Some(name.to_string_lossy().into_owned())
    }
}

/// On-disk form: every field but `format` may be omitted.
#[derive(Deserialize)]
struct ConfigFile {
    format: SourceFormat,
    #[serde(default)]
    source_path: Option<PathBuf>,
    #[serde(default)]
    delimiter: Option<Delimiter>,
    #[serde(default)]
    header_lines: Option<usize>,
    #[serde(default)]
    column_map: Option<Vec<usize>>,
    #[serde(default)]
    weight_rule: Option<WeightRule>,
    #[serde(default, deserialize_with = "explicit")]
    threshold: Option<Option<f64>>,
    #[serde(default, deserialize_with = "explicit")]
    roi_edge: Option<Option<f32>>,
    #[serde(default)]
    scale: Option<f64>,
    #[serde(default, deserialize_with = "explicit")]
    subsample_factor: Option<Option<f64>>,
    #[serde(default)]
    bias_exponent: Option<f64>,
    #[serde(default)]
    point_count: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    output_name: Option<String>,
}

/// Distinguishes an explicit `null` (filter off) from an absent key (preset).
fn explicit<'de, D, T>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl From<ConfigFile> for PipelineConfig {
    fn from(f: ConfigFile) -> Self {
        let p = PipelineConfig::preset(f.format);
        Self {
            format: f.format,
            source_path: f.source_path,
            delimiter: f.delimiter.unwrap_or(p.delimiter),
            header_lines: f.header_lines.unwrap_or(p.header_lines),
            column_map: f.column_map.unwrap_or(p.column_map),
            weight_rule: f.weight_rule.unwrap_or(p.weight_rule),
            threshold: f.threshold.unwrap_or(p.threshold),
            roi_edge: f.roi_edge.unwrap_or(p.roi_edge),
            scale: f.scale.unwrap_or(p.scale),
            subsample_factor: f.subsample_factor.unwrap_or(p.subsample_factor),
            bias_exponent: f.bias_exponent.unwrap_or(p.bias_exponent),
            point_count: f.point_count.or(p.point_count),
            seed: f.seed,
            output_dir: f.output_dir.unwrap_or(p.output_dir),
            output_name: f.output_name,
        }
    }
}
