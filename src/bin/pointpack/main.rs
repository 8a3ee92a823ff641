//! pointpack CLI - pack point catalogs into renderer point clouds.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pointpack::core::Statistics;
use pointpack::output;
use pointpack::pipeline::{self, Outcome, PipelineConfig};
use pointpack::source::{Delimiter, TextTable};

/// Log filter per verbosity flag; `POINTPACK_LOG` overrides.
const LOG_QUIET: &str = "error";
const LOG_INFO: &str = "info";
const LOG_DEBUG: &str = "debug";
const LOG_TRACE: &str = "trace";

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_env("POINTPACK_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = LOG_INFO;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = LOG_DEBUG,
            "-vv" | "--trace" => level = LOG_TRACE,
            "-q" | "--quiet" => level = LOG_QUIET,
            _ => filtered_args.push(arg),
        }
    }
    init_tracing(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let (command, rest) = (filtered_args[0], &filtered_args[1..]);
    let result = match command {
        "run" | "r" => cmd_run(rest),
        "halo" => cmd_preset(rest, "halo <catalog.list>", |p| PipelineConfig::halo_catalog(p)),
        "survey" => cmd_preset(rest, "survey <survey.dat>", |p| PipelineConfig::spherical_survey(p)),
        "mesh" => cmd_preset(rest, "mesh <mesh.obj>", |p| PipelineConfig::obj_mesh(p)),
        "synth" => cmd_synth(rest),
        "inspect" | "i" => cmd_inspect(rest),
        "hdr2pfm" => cmd_hdr2pfm(rest),
        "version" | "-V" | "--version" => {
            println!("pointpack {} (built {})", env!("CARGO_PKG_VERSION"), env!("POINTPACK_BUILD_DATE"));
            Ok(())
        }
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_help() {
    println!("pointpack - pack point catalogs into renderer point clouds");
    println!();
    println!("USAGE:");
    println!("    pointpack [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    r, run     <config.json>...    Run pipelines described by JSON configs");
    println!("    halo       <catalog.list>      Pack a Rockstar halo catalog");
    println!("    survey     <survey.dat>        Pack a spherical galaxy survey");
    println!("    mesh       <mesh.obj>          Pack OBJ mesh vertices");
    println!("    synth      <plane.dat>         Write regular, random and jittered sets sized from a 2D point file");
    println!("    i, inspect <points.bin>        Show statistics of a packed point file");
    println!("    hdr2pfm    <name>...           Convert <name>.hdr to <name>.pfm");
    println!("    version                        Show version");
    println!("    h, help                        Show this help");
    println!();
    println!("PIPELINE OPTIONS (halo, survey, mesh, synth):");
    println!("    --threshold=<t|off>   Keep records whose weight (survey: log-mass) exceeds t");
    println!("    --roi=<edge|off>      Keep records with x, y, z below edge");
    println!("    --scale=<s>           Mesh scale / synthetic box size");
    println!("    --subsample=<f|off>   Keep about one record in f");
    println!("    --bias=<b>            Synthetic z-axis power-law exponent");
    println!("    --seed=<n>            Random seed (default: system entropy)");
    println!("    --out=<dir>           Output directory (default: .)");
    println!("    --name=<stem>         Output file stem");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose  Debug output");
    println!("    -vv, --trace   Trace output (very verbose)");
    println!("    -q, --quiet    Errors only");
    println!();
    println!("ENVIRONMENT:");
    println!("    POINTPACK_LOG  tracing filter directive, overrides -v/-q");
}

/// Split positional arguments from `--key=value` options.
fn split_args<'a>(args: &[&'a str]) -> (Vec<&'a str>, Vec<(&'a str, &'a str)>) {
    let mut positional = Vec::new();
    let mut options = Vec::new();
    for &arg in args {
        match arg.strip_prefix("--").and_then(|kv| kv.split_once('=')) {
            Some(kv) => options.push(kv),
            None => positional.push(arg),
        }
    }
    (positional, options)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse::<T>().with_context(|| format!("invalid value for --{key}: {value:?}"))
}

fn parse_optional<T: std::str::FromStr>(key: &str, value: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if value.eq_ignore_ascii_case("off") || value.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse_value(key, value).map(Some)
    }
}

fn apply_options(config: &mut PipelineConfig, options: &[(&str, &str)]) -> Result<()> {
    for &(key, value) in options {
        match key {
            "threshold" | "t" => config.threshold = parse_optional(key, value)?,
            "roi" => config.roi_edge = parse_optional(key, value)?,
            "scale" => config.scale = parse_value(key, value)?,
            "subsample" => config.subsample_factor = parse_optional(key, value)?,
            "bias" => config.bias_exponent = parse_value(key, value)?,
            "seed" => config.seed = Some(parse_value(key, value)?),
            "out" => config.output_dir = PathBuf::from(value),
            "name" => config.output_name = Some(value.to_string()),
            _ => bail!("unknown option --{key}"),
        }
    }
    Ok(())
}

fn run_pipeline(config: &PipelineConfig) -> Result<()> {
    match pipeline::run(config)? {
        Outcome::Written(report) => {
            println!("{} points -> {}", report.stats.count, report.binary_path.display());
        }
        Outcome::Empty(filter) => {
            println!("No records selected ({} read)", filter.read);
        }
    }
    Ok(())
}

fn cmd_run(args: &[&str]) -> Result<()> {
    if args.is_empty() {
        bail!("missing config argument\nUsage: pointpack run <config.json>...");
    }
    for path in args {
        let config = PipelineConfig::load(path).with_context(|| format!("loading {path}"))?;
        info!("Running {}", path);
        run_pipeline(&config)?;
    }
    Ok(())
}

fn cmd_preset(args: &[&str], usage: &str, preset: fn(PathBuf) -> PipelineConfig) -> Result<()> {
    let (positional, options) = split_args(args);
    let Some(&path) = positional.first() else {
        bail!("missing file argument\nUsage: pointpack {usage} [options]");
    };
    let mut config = preset(PathBuf::from(path));
    apply_options(&mut config, &options)?;
    run_pipeline(&config)
}

/// Regular, random and jittered sets, each sized by the plane file's row count.
fn cmd_synth(args: &[&str]) -> Result<()> {
    let (positional, options) = split_args(args);
    let Some(&path) = positional.first() else {
        bail!("missing file argument\nUsage: pointpack synth <plane.dat> [options]");
    };
    let count = TextTable::open(path, Delimiter::Whitespace, 0)?.row_count();
    info!("{} plane points in {}", count, path);

    let configs = [
        PipelineConfig::regular_grid(count),
        PipelineConfig::uniform_random(count),
        PipelineConfig::jittered_plane(path),
    ];
    for mut config in configs {
        apply_options(&mut config, &options)?;
        run_pipeline(&config)?;
    }
    Ok(())
}

fn cmd_inspect(args: &[&str]) -> Result<()> {
    if args.is_empty() {
        bail!("missing file argument\nUsage: pointpack inspect <points.bin>...");
    }
    for path in args {
        let records = output::read_records(path).with_context(|| format!("reading {path}"))?;
        println!("File: {}", path);
        match Statistics::compute(&records) {
            Some(stats) => {
                print!("{}", output::sidecar_text(&stats));
                println!("Min weight = {:?}", stats.weight_min);
                println!("Max weight = {:?}", stats.weight_max);
                println!("Median weight = {:?}", stats.weight_median);
                let size = stats.bounds.size();
                println!("Extent = {:?} {:?} {:?}", size.x, size.y, size.z);
            }
            None => println!("Number of points = 0"),
        }
        check_sidecar(Path::new(path), &records);
        println!();
    }
    Ok(())
}

/// Compare against `<stem>_metadata.txt` if it sits next to the point file.
fn check_sidecar(path: &Path, records: &pointpack::RecordSet) {
    let Some(stem) = path.file_stem() else { return };
    let sidecar = path.with_file_name(format!("{}_metadata.txt", stem.to_string_lossy()));
    let Ok(text) = std::fs::read_to_string(&sidecar) else { return };

    let count = output::parse_sidecar(&text)
        .into_iter()
        .find(|(k, _)| k == output::metadata::LABEL_COUNT)
        .and_then(|(_, v)| v.parse::<usize>().ok());
    match count {
        Some(n) if n == records.len() => println!("Sidecar: {} (consistent)", sidecar.display()),
        Some(n) => warn!("{} lists {} points, file holds {}", sidecar.display(), n, records.len()),
        None => warn!("{} has no point count", sidecar.display()),
    }
}

#[cfg(feature = "hdr")]
fn cmd_hdr2pfm(args: &[&str]) -> Result<()> {
    if args.is_empty() {
        bail!("missing image name\nUsage: pointpack hdr2pfm <name>...");
    }
    for name in args {
        pointpack::hdr::convert_hdr_to_pfm(format!("{name}.hdr"), format!("{name}.pfm"))?;
    }
    Ok(())
}

#[cfg(not(feature = "hdr"))]
fn cmd_hdr2pfm(_args: &[&str]) -> Result<()> {
    bail!("HDR conversion not available. Rebuild with: cargo build --features hdr")
}
