//! End-to-end packing: read, transform, filter, then write statistics and the
//! binary point file.
//!
//! ```text
//!   source file / generator
//!         │
//!         ▼
//!   ┌────────────┐
//!   │  source     │  rows in source order
//!   └────────────┘
//!         │
//!         ▼
//!   ┌────────────┐
//!   │ transform   │  Candidate { record, key }
//!   └────────────┘
//!         │
//!         ▼
//!   ┌────────────┐
//!   │  filter     │  threshold → ROI → subsample
//!   └────────────┘
//!         │
//!    ┌────┴─────┐
//!    ▼          ▼
//!  sidecar    .bin
//! ```

mod config;

pub use config::{PipelineConfig, SourceFormat};

use std::path::PathBuf;

use tracing::{info, warn};

use crate::core::{format_value, RecordSet, Statistics};
use crate::filter::FilterReport;
use crate::output;
use crate::source::{mesh, synthetic, Distribution, HaloRow, SurveyRow, TextTable};
use crate::transform;
use crate::util::{Error, Result, Sampler};

/// Result of a successful run.
#[derive(Debug)]
pub enum Outcome {
    /// Files were written.
    Written(PackReport),
    /// No record passed filtering; nothing was written.
    Empty(FilterReport),
}

/// Where a run wrote its outputs and what they contain.
#[derive(Debug, Clone)]
pub struct PackReport {
    pub stats: Statistics,
    pub filter: FilterReport,
    pub binary_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// Read, transform and filter the configured source.
///
/// Validates `config` first. Does not touch the output directory.
pub fn load_records(config: &PipelineConfig, sampler: &mut Sampler) -> Result<(RecordSet, FilterReport)> {
    config.validate()?;
    let filters = config.filters();
    let columns = config.column_map.as_slice();
    let dist = Distribution {
        box_size: config.scale,
        bias: config.bias_exponent,
        weight: config.weight_rule,
    };

    match config.format {
        SourceFormat::HaloCatalog => {
            let table = open_table(config)?;
            let rule = config.weight_rule;
            let rows = table.parse::<HaloRow>(columns).map(|r| r.map(|row| transform::halo(&row, rule)));
            filters.collect(rows, table.row_count(), sampler)
        }
        SourceFormat::SphericalSurvey => {
            let table = open_table(config)?;
            let rule = config.weight_rule;
            let rows = table.parse::<SurveyRow>(columns).map(|r| r.map(|row| transform::survey(&row, rule)));
            filters.collect(rows, table.row_count(), sampler)
        }
        SourceFormat::ObjMesh => {
            let table = open_table(config)?;
            let (scale, rule) = (config.scale, config.weight_rule);
            let rows = mesh::vertices(&table, columns).map(|r| r.map(|row| transform::vertex(&row, scale, rule)));
            filters.collect(rows, mesh::vertex_count(&table), sampler)
        }
        SourceFormat::RegularGrid => {
            let count = config.point_count.unwrap_or_default();
            let points = synthetic::regular_grid(count, &dist)?;
            let n = points.len();
            filters.collect(points.into_iter().map(Ok), n, sampler)
        }
        SourceFormat::UniformRandom => {
            let count = config.point_count.unwrap_or_default();
            let points = synthetic::uniform_random(count, &dist, sampler);
            filters.collect(points.into_iter().map(Ok), count, sampler)
        }
        SourceFormat::JitteredPlane => {
            let table = open_table(config)?;
            let points = synthetic::jittered_plane(&table, columns, &dist, sampler)?;
            let n = points.len();
            filters.collect(points.into_iter().map(Ok), n, sampler)
        }
    }
}

fn open_table(config: &PipelineConfig) -> Result<TextTable> {
    let path = config
        .source_path
        .as_ref()
        .ok_or_else(|| Error::config("missing source_path"))?;
    info!("Reading {}", path.display());
    TextTable::open(path, config.delimiter, config.header_lines)
}

/// Run a full packing pipeline.
///
/// An empty result is a normal outcome: it is logged and no files are written.
#[tracing::instrument(skip_all, fields(format = ?config.format))]
pub fn run(config: &PipelineConfig) -> Result<Outcome> {
    let mut sampler = Sampler::new(config.seed);
    let (records, filter) = load_records(config, &mut sampler)?;

    let Some(stats) = Statistics::compute(&records) else {
        warn!("No records passed filtering ({} read); nothing written", filter.read);
        return Ok(Outcome::Empty(filter));
    };
    log_summary(&stats, &records);

    std::fs::create_dir_all(&config.output_dir)?;
    let stem = config.output_stem(stats.count);
    let metadata_path = config.output_dir.join(format!("{stem}_metadata.txt"));
    let binary_path = config.output_dir.join(format!("{stem}.bin"));

    output::write_records(&binary_path, &records)?;
    if let Err(e) = output::write_metadata(&metadata_path, &stats) {
        // no point file without its sidecar
        let _ = std::fs::remove_file(&binary_path);
        return Err(e);
    }
    info!("Wrote {} and {}", binary_path.display(), metadata_path.display());

    Ok(Outcome::Written(PackReport { stats, filter, binary_path, metadata_path }))
}

/// Console report: everything in the sidecar plus weight min/max/median and
/// the first record.
pub fn log_summary(stats: &Statistics, records: &RecordSet) {
    let b = &stats.bounds;
    info!("Min/Max X: {} {}", format_value(b.min.x), format_value(b.max.x));
    info!("Min/Max Y: {} {}", format_value(b.min.y), format_value(b.max.y));
    info!("Min/Max Z: {} {}", format_value(b.min.z), format_value(b.max.z));
    info!(
        "Min/Max/Avg/Med weight: {} {} {} {}",
        format_value(stats.weight_min),
        format_value(stats.weight_max),
        format_value(stats.weight_mean),
        format_value(stats.weight_median)
    );
    if let Some(r) = records.first() {
        info!("Sample record: [{} {} {} {}]", r.x, r.y, r.z, r.weight);
    }
    info!("Number of records: {}", stats.count);
}
