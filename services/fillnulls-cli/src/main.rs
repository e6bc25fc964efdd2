//! Fill no-data areas in raster maps.
//!
//! Opens a mapset directory, fills the null cells of the input raster by
//! spline interpolation from the ring of cells around them, and writes
//! the result to a new raster in the same mapset.

mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use fillnulls::{DirectoryMapset, FillNulls, FillReport, LocalCapabilities};
use settings::{Overrides, Settings};

#[derive(Parser, Debug)]
#[command(name = "fillnulls")]
#[command(about = "Fills no-data areas in raster maps using spline interpolation")]
struct Args {
    /// Mapset directory holding the rasters
    #[arg(short, long, env = "FILLNULLS_MAPSET")]
    mapset: PathBuf,

    /// Raster map in which to fill nulls
    #[arg(short, long)]
    input: String,

    /// Output raster map with nulls filled by interpolation from surrounding values
    #[arg(short, long)]
    output: String,

    /// Spline tension parameter [default: 40]
    #[arg(long)]
    tension: Option<f64>,

    /// Spline smoothing parameter [default: 0.1]
    #[arg(long)]
    smooth: Option<f64>,

    /// Replace the output raster if it exists
    #[arg(long)]
    overwrite: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json_report: bool,
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    match run(&args) {
        Ok(report) => {
            print_report(&report, args.json_report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "fillnulls failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(args: &Args) -> Result<FillReport> {
    let settings = Settings::load(args.config.as_deref())?
        .with_env_overrides()
        .with_overrides(&Overrides {
            tension: args.tension,
            smooth: args.smooth,
            overwrite: args.overwrite,
        });
    settings.validate()?;
    info!(
        tension = settings.fill.tension,
        smooth = settings.fill.smooth,
        segment_threshold = settings.fill.segment_threshold,
        overwrite = settings.fill.overwrite,
        "Loaded configuration"
    );

    let mut mapset = DirectoryMapset::open(&args.mapset)
        .with_context(|| format!("failed to open mapset {}", args.mapset.display()))?;

    let fill = FillNulls::new(LocalCapabilities::with_rst_config(settings.rst), settings.fill);
    let report = fill
        .run(&mut mapset, &args.input, &args.output)
        .with_context(|| format!("failed to fill nulls of <{}>", args.input))?;

    info!("Done");
    Ok(report)
}

fn print_report(report: &FillReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(text) => println!("{}", text),
            Err(e) => error!(error = %e, "Failed to serialize report"),
        }
        return;
    }

    println!("Filled raster map is: {}", report.output);
    println!("  run id:          {}", report.run_id);
    println!("  null cells:      {}", report.null_cells);
    println!("  filled cells:    {}", report.filled_cells);
    println!("  boundary points: {}", report.boundary_points);
    println!("  segmented:       {}", report.segmented);
    println!("  user mask used:  {}", report.used_user_mask);
}
