//! End-to-end packing runs against small fixture files.

use std::fs;
use std::path::{Path, PathBuf};

use pointpack::core::{Statistics, RECORD_SIZE};
use pointpack::output::{self, metadata};
use pointpack::pipeline::{self, Outcome, PackReport, PipelineConfig, SourceFormat};
use pointpack::{Error, ErrorKind};

use tempfile::TempDir;

fn halo_catalog(rows: &[(f64, f64, f64, f64)]) -> String {
    let mut text = String::new();
    text.push_str("#ID DescID Mvir Vmax Vrms Rvir Rs Np X Y Z VX VY VZ\n");
    for i in 1..16 {
        text.push_str(&format!("#header line {i}\n"));
    }
    for (id, &(mass, x, y, z)) in rows.iter().enumerate() {
        text.push_str(&format!("{id} -1 {mass:e} 210.5 200.1 150.0 30.0 120 {x} {y} {z} 1.0 -2.0 3.0\n"));
    }
    text
}

fn write_fixture(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("Failed to write fixture");
    path
}

fn written(outcome: Outcome) -> PackReport {
    match outcome {
        Outcome::Written(report) => report,
        Outcome::Empty(f) => panic!("expected output, got empty result ({f:?})"),
    }
}

fn sidecar_value(text: &str, label: &str) -> String {
    metadata::parse_sidecar(text)
        .into_iter()
        .find(|(k, _)| k == label)
        .map(|(_, v)| v)
        .unwrap_or_else(|| panic!("missing {label}"))
}

#[test]
fn test_halo_threshold_and_roi() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let src_dir = temp.path().join("rockstar_box");
    fs::create_dir(&src_dir).unwrap();
    let catalog = halo_catalog(&[
        (2.0e12, 10.0, 20.0, 30.0),
        (0.0, 11.0, 21.0, 31.0),    // zero mass, below threshold
        (5.0e12, 300.0, 20.0, 30.0), // outside ROI
        (1.0e13, 100.0, 200.0, 255.5),
        (3.0e12, 50.0, 256.0, 1.0),  // on the ROI edge, excluded
    ]);
    let path = write_fixture(&src_dir, "out_66.list", &catalog);

    let mut config = PipelineConfig::halo_catalog(&path);
    config.output_dir = temp.path().join("packed");
    let report = written(pipeline::run(&config).expect("Failed to run"));

    assert_eq!(report.stats.count, 2);
    assert_eq!(report.filter.below_threshold, 1);
    assert_eq!(report.filter.outside_roi, 2);
    assert_eq!(
        report.binary_path.file_name().unwrap().to_str().unwrap(),
        "rockstar_box_out_66t=0.0roi=256.0.bin"
    );

    let records = output::read_records(&report.binary_path).unwrap();
    assert_eq!(fs::metadata(&report.binary_path).unwrap().len(), (RECORD_SIZE * 2) as u64);
    for r in &records {
        assert!(r.weight > 0.0);
        assert!(r.x < 256.0 && r.y < 256.0 && r.z < 256.0);
    }
    assert_eq!(records.as_slice()[0].weight, 2.0);
    assert_eq!(records.as_slice()[1].weight, 10.0);
}

#[test]
fn test_sidecar_matches_binary() {
    let temp = TempDir::new().unwrap();
    let catalog = halo_catalog(&[
        (1.5e12, 1.25, 2.5, 3.75),
        (4.0e12, 7.0, 0.5, 9.0),
        (2.25e12, 3.0, 8.0, 0.125),
    ]);
    let path = write_fixture(temp.path(), "halos.list", &catalog);

    let mut config = PipelineConfig::halo_catalog(&path);
    config.output_dir = temp.path().to_path_buf();
    let report = written(pipeline::run(&config).unwrap());

    let text = fs::read_to_string(&report.metadata_path).unwrap();
    let records = output::read_records(&report.binary_path).unwrap();
    let stats = Statistics::compute(&records).unwrap();

    let value = |label| sidecar_value(&text, label).parse::<f32>().unwrap();
    assert_eq!(sidecar_value(&text, metadata::LABEL_COUNT), records.len().to_string());
    assert_eq!(value(metadata::LABEL_MIN_X), stats.bounds.min.x);
    assert_eq!(value(metadata::LABEL_MAX_X), stats.bounds.max.x);
    assert_eq!(value(metadata::LABEL_MIN_Y), stats.bounds.min.y);
    assert_eq!(value(metadata::LABEL_MAX_Y), stats.bounds.max.y);
    assert_eq!(value(metadata::LABEL_MIN_Z), stats.bounds.min.z);
    assert_eq!(value(metadata::LABEL_MAX_Z), stats.bounds.max.z);
    assert_eq!(value(metadata::LABEL_MEAN_WEIGHT), stats.weight_mean);
    assert_eq!(metadata::parse_sidecar(&text).len(), 8);
}

#[test]
fn test_empty_result_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let catalog = halo_catalog(&[(0.0, 1.0, 1.0, 1.0), (-1.0, 2.0, 2.0, 2.0)]);
    let path = write_fixture(temp.path(), "empty.list", &catalog);
    let out_dir = temp.path().join("out");

    let mut config = PipelineConfig::halo_catalog(&path);
    config.output_dir = out_dir.clone();
    match pipeline::run(&config).expect("empty result is not an error") {
        Outcome::Empty(report) => {
            assert_eq!(report.read, 2);
            assert_eq!(report.accepted, 0);
        }
        Outcome::Written(_) => panic!("nothing should be written"),
    }
    assert!(!out_dir.exists());
}

#[test]
fn test_survey_pole_and_equator() {
    let temp = TempDir::new().unwrap();
    let text = "\
id ra dec dist logmass
1 0.0 90.0 250.0 11.0
2 90.0 0.0 100.0 12.0
3 45.0 10.0 80.0 -1.0
";
    let path = write_fixture(temp.path(), "slice.dat", text);

    let mut config = PipelineConfig::spherical_survey(&path);
    config.output_dir = temp.path().to_path_buf();
    let report = written(pipeline::run(&config).unwrap());
    assert!(report.binary_path.ends_with("slice_t=0.0.bin"));

    let records = output::read_records(&report.binary_path).unwrap();
    assert_eq!(records.len(), 2);

    let pole = records.as_slice()[0];
    assert_eq!((pole.x, pole.y, pole.z), (0.0, 0.0, 250.0));
    assert!((pole.weight - 0.1).abs() < 1e-7);

    let eq = records.as_slice()[1];
    assert!(eq.x.abs() < 1e-4);
    assert!((eq.y - 100.0).abs() < 1e-4);
    assert!(eq.z.abs() < 1e-4);
    assert!((eq.weight - 1.0).abs() < 1e-6);
}

#[test]
fn test_regular_grid_is_deterministic() {
    let temp = TempDir::new().unwrap();
    let mut paths = Vec::new();
    for run in 0..2 {
        let mut config = PipelineConfig::regular_grid(1000);
        config.output_dir = temp.path().join(format!("run{run}"));
        let report = written(pipeline::run(&config).unwrap());
        assert_eq!(report.stats.count, 1000);
        assert!(report.binary_path.ends_with("regular_1000_3d_bias=3.0.bin"));
        paths.push(report.binary_path);
    }
    let a = fs::read(&paths[0]).unwrap();
    let b = fs::read(&paths[1]).unwrap();
    assert_eq!(a.len(), 16 * 1000);
    assert_eq!(a, b);
}

#[test]
fn test_seeded_random_is_reproducible() {
    let temp = TempDir::new().unwrap();
    let run = |dir: &str| {
        let mut config = PipelineConfig::uniform_random(256);
        config.seed = Some(2024);
        config.output_dir = temp.path().join(dir);
        written(pipeline::run(&config).unwrap()).binary_path
    };
    assert_eq!(fs::read(run("a")).unwrap(), fs::read(run("b")).unwrap());
}

#[test]
fn test_mesh_subsample_one_keeps_all_vertices() {
    let temp = TempDir::new().unwrap();
    let mut obj = String::from("# scan\no head\n");
    for i in 0..50 {
        obj.push_str(&format!("v {} {} {}\n", i as f32 * 0.1, 1.0, -0.5));
        obj.push_str("vn 0 1 0\n");
    }
    obj.push_str("f 1 2 3\n");
    let path = write_fixture(temp.path(), "head.obj", &obj);

    let mut config = PipelineConfig::obj_mesh(&path);
    config.subsample_factor = Some(1.0);
    config.output_dir = temp.path().to_path_buf();
    let report = written(pipeline::run(&config).unwrap());

    assert_eq!(report.stats.count, 50);
    assert!(report.binary_path.ends_with("head_n=50.bin"));
    let records = output::read_records(&report.binary_path).unwrap();
    let first = records.as_slice()[0];
    // x' = 20 vx, y' = 20 vz, z' = -20 vy
    assert_eq!((first.x, first.y, first.z, first.weight), (0.0, -10.0, -20.0, 1.0));
}

#[test]
fn test_mesh_default_subsampling_reduces() {
    let temp = TempDir::new().unwrap();
    let obj: String = (0..2000).map(|i| format!("v {i} 0 0\n")).collect();
    let path = write_fixture(temp.path(), "dense.obj", &obj);

    let mut config = PipelineConfig::obj_mesh(&path);
    config.seed = Some(1);
    config.output_dir = temp.path().to_path_buf();
    let report = written(pipeline::run(&config).unwrap());
    // keep one in five on average
    assert!((300..500).contains(&report.stats.count), "kept {}", report.stats.count);
    assert_eq!(report.filter.sampled_out + report.stats.count, 2000);
}

#[test]
fn test_malformed_row_aborts() {
    let temp = TempDir::new().unwrap();
    let mut catalog = halo_catalog(&[(2.0e12, 1.0, 1.0, 1.0)]);
    catalog.push_str("7 -1 3e12 1 2\n");
    let path = write_fixture(temp.path(), "bad.list", &catalog);
    let out_dir = temp.path().join("out");

    let mut config = PipelineConfig::halo_catalog(&path);
    config.output_dir = out_dir.clone();
    let err = pipeline::run(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(matches!(err, Error::MissingColumn { line: 18, index: 8, found: 5 }));
    assert!(!out_dir.exists());
}

#[test]
fn test_missing_source_file() {
    let temp = TempDir::new().unwrap();
    let config = PipelineConfig::obj_mesh(temp.path().join("nope.obj"));
    let err = pipeline::run(&config).unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_jittered_plane_from_json_config() {
    let temp = TempDir::new().unwrap();
    let plane = write_fixture(temp.path(), "poisson_8_2d.dat", "0.1 0.2\n0.3 0.4\n0.5 0.6\n0.7 0.8\n");
    let config_path = temp.path().join("plane.json");
    let json = serde_json::json!({
        "format": "jittered_plane",
        "source_path": plane,
        "seed": 3,
        "output_dir": temp.path().join("out"),
    });
    fs::write(&config_path, json.to_string()).unwrap();

    let config = PipelineConfig::load(&config_path).expect("Failed to load config");
    assert_eq!(config.format, SourceFormat::JitteredPlane);
    assert_eq!(config.scale, 100.0);

    let report = written(pipeline::run(&config).unwrap());
    assert_eq!(report.stats.count, 4);
    assert!(report.binary_path.ends_with("poisson_8_2d_3d_bias=3.0.bin"));
    let records = output::read_records(&report.binary_path).unwrap();
    for r in &records {
        assert!((0.0..=100.0).contains(&r.z));
        assert!((r.weight - r.z / 100.0).abs() < 1e-6);
    }
}

#[test]
fn test_blank_line_in_survey_aborts() {
    let temp = TempDir::new().unwrap();
    let path = write_fixture(temp.path(), "gap.dat", "h\n1 0 90 10 11\n\n2 90 0 10 12\n");
    let out_dir = temp.path().join("out");

    let mut config = PipelineConfig::spherical_survey(&path);
    config.output_dir = out_dir.clone();
    let err = pipeline::run(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(matches!(err, Error::MissingColumn { line: 3, found: 0, .. }));
    assert!(!out_dir.exists());
}

#[test]
fn test_blank_line_in_mesh_is_ignored() {
    let temp = TempDir::new().unwrap();
    let path = write_fixture(temp.path(), "gap.obj", "v 0 0 0\n\nv 1 1 1\n");

    let mut config = PipelineConfig::obj_mesh(&path);
    config.subsample_factor = None;
    config.output_dir = temp.path().to_path_buf();
    assert_eq!(written(pipeline::run(&config).unwrap()).stats.count, 2);
}

#[test]
fn test_failed_point_file_leaves_no_sidecar() {
    let temp = TempDir::new().unwrap();
    let catalog = halo_catalog(&[(2.0e12, 1.0, 1.0, 1.0)]);
    let path = write_fixture(temp.path(), "halos.list", &catalog);

    let mut config = PipelineConfig::halo_catalog(&path);
    config.output_dir = temp.path().join("out");
    config.output_name = Some("pack".into());
    // a directory where the point file should go
    fs::create_dir_all(config.output_dir.join("pack.bin")).unwrap();

    let err = pipeline::run(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!config.output_dir.join("pack_metadata.txt").exists());
}

#[test]
fn test_saved_config_runs_identically() {
    let temp = TempDir::new().unwrap();
    let mut config = PipelineConfig::uniform_random(128);
    config.seed = Some(77);
    config.bias_exponent = 2.0;
    config.roi_edge = Some(90.0);
    config.output_dir = temp.path().join("a");

    let saved = temp.path().join("random.json");
    config.save(&saved).expect("Failed to save config");
    let mut loaded = PipelineConfig::load(&saved).expect("Failed to load config");
    assert_eq!(loaded, config);

    loaded.output_dir = temp.path().join("b");
    let a = written(pipeline::run(&config).unwrap()).binary_path;
    let b = written(pipeline::run(&loaded).unwrap()).binary_path;
    assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
}
