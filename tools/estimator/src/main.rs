//! Flow estimator CLI.
//! Solves Manning's equation for one water level, or sweeps a rating curve,
//! on a trapezoid or an irregular station/elevation profile.  With
//! --output, writes FlowEstimatorResults.txt, FlowEstimatorXS.txt (profiles
//! only) and FlowEstimatorResult.json to the given directory.

use anyhow::{bail, Context, Result};
use clap::Parser;
use flow_core::rating::rating_curve_for_request;
use flow_core::report::{write_report, ReportHeader, ReportSection};
use flow_core::slope::longitudinal_slope;
use flow_core::{
    ChannelSource, FlowEstimator, FlowRequest, FlowResult, Profile, RatingOptions, RatingPoint, SolverConfig,
    TrapezoidParams, UnitSystem,
};
use serde::Serialize;
use std::{
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "estimator", about = "Estimate uniform open-channel flow with Manning's equation")]
struct Args {
    /// Request JSON file (replaces all channel and flow flags).
    #[arg(long, conflicts_with_all = ["profile", "depth"])]
    request: Option<PathBuf>,

    /// Cross-section file: whitespace-separated station/elevation rows.
    #[arg(short, long, conflicts_with = "depth")]
    profile: Option<PathBuf>,

    /// Trapezoid design depth.
    #[arg(long)]
    depth: Option<f64>,

    /// Trapezoid bottom width.
    #[arg(long, requires = "depth")]
    bottom_width: Option<f64>,

    /// Trapezoid left side slope (horizontal per unit rise).
    #[arg(long, default_value_t = 0.0)]
    left_slope: f64,

    /// Trapezoid right side slope (horizontal per unit rise).
    #[arg(long, default_value_t = 0.0)]
    right_slope: f64,

    /// Water surface elevation for a single estimate.
    #[arg(short, long)]
    wse: Option<f64>,

    /// Manning's roughness coefficient.
    #[arg(short = 'n', long = "roughness")]
    roughness_n: Option<f64>,

    /// Channel bed slope (rise/run).
    #[arg(short, long)]
    slope: Option<f64>,

    /// metric (m) or imperial (ft).
    #[arg(short, long, default_value = "metric")]
    units: UnitSystem,

    /// Sweep the admissible water-level range instead of (or besides) one estimate.
    #[arg(short, long)]
    rating: bool,

    /// Water-level increment of the rating sweep.
    #[arg(long, default_value_t = flow_core::rating::DEFAULT_STEP)]
    step: f64,

    /// Directory for the report, cross-section and JSON result files.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Longitudinal profile file; prints its bed slope and exits.
    #[arg(long)]
    slope_profile: Option<PathBuf>,

    /// Log filter (e.g. debug, flow_core=trace). Falls back to RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

// ── Output record ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RunSummary<'a> {
    request: &'a FlowRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a FlowResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rating: Vec<RatingPoint>,
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_logging(level: Option<&str>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(filter) = level {
        builder.parse_filters(filter);
    }
    builder.format_timestamp(None).init();
}

fn build_request(args: &Args) -> Result<FlowRequest> {
    if let Some(path) = &args.request {
        let json = fs::read_to_string(path).with_context(|| format!("reading request {}", path.display()))?;
        return FlowRequest::from_json(&json).with_context(|| format!("parsing request {}", path.display()));
    }

    let trapezoid = match args.depth {
        Some(depth) => Some(TrapezoidParams {
            depth,
            bottom_width: args.bottom_width.context("--bottom-width is required with --depth")?,
            left_side_slope: args.left_slope,
            right_side_slope: args.right_slope,
        }),
        None => None,
    };
    let source = ChannelSource::from_parts(args.profile.clone(), None, trapezoid)
        .context("give --request, --profile, or --depth with --bottom-width")?;

    if args.wse.is_none() && !args.rating {
        bail!("nothing to do: give --wse for one estimate and/or --rating for a sweep");
    }

    Ok(FlowRequest {
        // Ignored by the rating sweep.
        water_surface_elevation: args.wse.unwrap_or_default(),
        roughness_n: args.roughness_n.context("-n/--roughness is required")?,
        slope: args.slope.context("-s/--slope is required")?,
        units: args.units,
        source,
    })
}

fn source_label(source: &ChannelSource) -> String {
    match source {
        ChannelSource::File { path } => path.display().to_string(),
        ChannelSource::Profile { .. } => "request points".to_string(),
        ChannelSource::Trapezoid(_) => "trapezoid".to_string(),
    }
}

// ── Output files ──────────────────────────────────────────────────────────────

fn write_outputs(
    dir: &Path,
    request: &FlowRequest,
    profile: &Profile,
    result: Option<&FlowResult>,
    rating: Vec<RatingPoint>,
) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    // A lone estimate still gets a one-row table in the report.
    let table: Vec<RatingPoint> = match (&rating[..], result) {
        ([], Some(r)) => vec![RatingPoint::from_result(request.water_surface_elevation, r)],
        _ => rating.clone(),
    };

    let label = source_label(&request.source);
    let section = match &request.source {
        ChannelSource::Trapezoid(params) => ReportSection::Trapezoid(params),
        _ => ReportSection::Irregular { source: &label, profile },
    };
    let header = ReportHeader {
        units: request.units,
        slope: request.slope,
        roughness_n: request.roughness_n,
        section,
    };
    let report_path = dir.join("FlowEstimatorResults.txt");
    let file = fs::File::create(&report_path).with_context(|| format!("creating {}", report_path.display()))?;
    write_report(BufWriter::new(file), &header, &table)
        .with_context(|| format!("writing {}", report_path.display()))?;
    eprintln!("Wrote {}", report_path.display());

    if !matches!(request.source, ChannelSource::Trapezoid(_)) {
        let xs_path = dir.join("FlowEstimatorXS.txt");
        let file = fs::File::create(&xs_path).with_context(|| format!("creating {}", xs_path.display()))?;
        profile
            .write_tsv(BufWriter::new(file))
            .with_context(|| format!("writing {}", xs_path.display()))?;
        eprintln!("Wrote {}", xs_path.display());
    }

    let json_path = dir.join("FlowEstimatorResult.json");
    let summary = RunSummary { request, result, rating };
    fs::write(&json_path, serde_json::to_string_pretty(&summary)?)
        .with_context(|| format!("writing {}", json_path.display()))?;
    eprintln!("Wrote {}", json_path.display());
    Ok(())
}

fn print_rating(curve: &[RatingPoint], units: UnitSystem) {
    println!("# lengths in {}", units.length_label());
    println!("wse\tflow\tvelocity\tR\tarea\ttop width\tdepth");
    for p in curve {
        println!(
            "{:.3}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
            p.wse, p.discharge, p.velocity, p.hydraulic_radius, p.wetted_area, p.top_width, p.max_depth
        );
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    if let Some(path) = &args.slope_profile {
        let profile = Profile::load(path).with_context(|| format!("loading {}", path.display()))?;
        let slope = longitudinal_slope(&profile)?;
        let run = profile.last().station - profile.first().station;
        eprintln!("{} samples over {:.3} {}", profile.len(), run, args.units.length_label());
        println!("{slope:.6}");
        return Ok(());
    }

    let request = build_request(&args)?;
    let estimator = FlowEstimator::new(SolverConfig::for_units(request.units));
    let profile = estimator.resolve_profile(&request.source)?;
    let range = estimator.wse_range(&request.source, &profile)?;
    eprintln!(
        "Channel: {} ({} vertices), admissible WSE [{:.3}, {:.3}] {}",
        source_label(&request.source),
        profile.len(),
        range.min,
        range.max,
        request.units.length_label()
    );

    let single = args.request.is_some() || args.wse.is_some();
    let result = if single {
        let manning = request.manning()?;
        let r = estimator
            .estimate_profile(&profile, request.water_surface_elevation, &manning)
            .with_context(|| format!("estimating flow at WSE {}", request.water_surface_elevation))?;
        eprintln!(
            "Q = {:.3}  v = {:.3}  A = {:.3}  P = {:.3}  R = {:.3}  T = {:.3}",
            r.discharge, r.velocity, r.wetted_area, r.wetted_perimeter, r.hydraulic_radius, r.top_width
        );
        Some(r)
    } else {
        None
    };

    let rating = if args.rating {
        let curve = rating_curve_for_request(&estimator, &request, &RatingOptions { step: args.step })
            .context("rating sweep failed")?;
        eprintln!("Rating curve: {} levels", curve.len());
        curve
    } else {
        Vec::new()
    };

    match (&result, rating.is_empty()) {
        (_, false) => print_rating(&rating, request.units),
        (Some(r), true) => println!("{}", serde_json::to_string_pretty(r)?),
        (None, true) => {}
    }

    if let Some(dir) = &args.output {
        write_outputs(dir, &request, &profile, result.as_ref(), rating)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("estimator").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn trapezoid_flags_build_request() {
        let args = parse(&["--depth", "1.5", "--bottom-width", "3", "--left-slope", "2", "-w", "1", "-n", "0.013", "-s", "0.001"]);
        let req = build_request(&args).unwrap();
        match req.source {
            ChannelSource::Trapezoid(p) => {
                assert_eq!(p.depth, 1.5);
                assert_eq!(p.left_side_slope, 2.0);
                assert_eq!(p.right_side_slope, 0.0);
            }
            other => panic!("expected trapezoid, got {other:?}"),
        }
        assert_eq!(req.units, UnitSystem::Metric);
    }

    #[test]
    fn missing_roughness_is_reported() {
        let args = parse(&["--depth", "1", "--bottom-width", "2", "-w", "0.5", "-s", "0.001"]);
        let err = build_request(&args).unwrap_err();
        assert!(err.to_string().contains("--roughness"), "{err}");
    }

    #[test]
    fn nothing_to_do_without_wse_or_rating() {
        let args = parse(&["--depth", "1", "--bottom-width", "2", "-n", "0.03", "-s", "0.001"]);
        assert!(build_request(&args).is_err());
        let args = parse(&["--depth", "1", "--bottom-width", "2", "-n", "0.03", "-s", "0.001", "--rating"]);
        assert!(build_request(&args).is_ok());
    }

    #[test]
    fn units_accept_short_labels() {
        let args = parse(&["--profile", "xs.txt", "-u", "ft", "--rating", "-n", "0.03", "-s", "0.001"]);
        assert_eq!(args.units, UnitSystem::Imperial);
    }

    #[test]
    fn request_conflicts_with_channel_flags() {
        let argv = ["estimator", "--request", "r.json", "--depth", "1"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn outputs_land_in_directory() {
        let dir = std::env::temp_dir().join(format!("flow-estimator-test-{}", std::process::id()));
        let request = FlowRequest {
            water_surface_elevation: 5.0,
            roughness_n: 0.03,
            slope: 0.001,
            units: UnitSystem::Metric,
            source: ChannelSource::Profile { points: vec![(0.0, 10.0), (5.0, 0.0), (15.0, 0.0), (20.0, 10.0)] },
        };
        let estimator = FlowEstimator::default();
        let profile = estimator.resolve_profile(&request.source).unwrap();
        let result = estimator.estimate(&request).unwrap();
        write_outputs(&dir, &request, &profile, Some(&result), Vec::new()).unwrap();

        let report = fs::read_to_string(dir.join("FlowEstimatorResults.txt")).unwrap();
        assert!(report.contains("Source:\trequest points\n"));
        assert!(report.contains("\n5.000\t"));
        assert!(dir.join("FlowEstimatorXS.txt").exists());
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("FlowEstimatorResult.json")).unwrap()).unwrap();
        assert!((json["result"]["wetted_area"].as_f64().unwrap() - 62.5).abs() < 1e-9);
        assert!(json.get("rating").is_none());
        fs::remove_dir_all(&dir).unwrap();
    }
}
