//! gamut - HDR tone-curve and gamut-mapping CLI
//!
//! Inspects curves, maps single pixels and dumps LUT triples.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "gamut")]
#[command(author, version, about = "HDR tone-curve and gamut-mapping tool")]
#[command(long_about = "
Builds a three-segment Bezier tone curve and maps scene-linear RGB through it.

Examples:
  gamut curve                                # Control points of the default curve
  gamut curve --samples 16 --slope 1.8       # Plus 16 rows of the sample table
  gamut pixel 2.0 0.1 0.1 --exposure 1       # Map one pixel
  gamut pixel 0.18 0.18 0.18 --encoding srgb
  gamut lut --size 33 --3d -o look.txt       # Dump 3D LUT triples
  gamut config --config look.yaml            # Print the effective config
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    params: ParamArgs,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

/// Mapper parameters shared by every subcommand.
#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// YAML config file; flags below override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Mid-section slope (1.02 - 6.5)
    #[arg(long, global = true)]
    slope: Option<f32>,

    /// Lower exposure bound in stops
    #[arg(long, global = true, allow_hyphen_values = true)]
    min_exposure: Option<f32>,

    /// Upper exposure bound in stops
    #[arg(long, global = true, allow_hyphen_values = true)]
    max_exposure: Option<f32>,

    /// Mid-grey value (scene and display)
    #[arg(long, global = true)]
    grey: Option<f32>,

    /// Compression latitude in normalized log2 units
    #[arg(long, global = true)]
    latitude: Option<f32>,

    /// Mapping mode: max-rgb, per-channel
    #[arg(long, global = true)]
    mode: Option<String>,

    /// Disable chromaticity compression
    #[arg(long, global = true)]
    no_compression: bool,

    /// Compression falloff: linear, smoothstep
    #[arg(long, global = true)]
    falloff: Option<String>,

    /// Table lookup: nearest, bilinear
    #[arg(long, global = true)]
    lookup: Option<String>,

    /// Sample spacing: linear, quadratic, log2
    #[arg(long, global = true)]
    spacing: Option<String>,

    /// Samples per curve table
    #[arg(long, global = true)]
    table_size: Option<usize>,

    /// Output encoding: linear, gamma22, srgb, pq, pq:<nits>
    #[arg(long, global = true)]
    encoding: Option<String>,

    /// Paint out-of-range input red/green
    #[arg(long, global = true)]
    debug_overlay: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show control points and sample table of the curve
    #[command(visible_alias = "c")]
    Curve(CurveArgs),

    /// Map one RGB pixel
    #[command(visible_alias = "p")]
    Pixel(PixelArgs),

    /// Dump 1D or 3D LUT triples
    Lut(LutArgs),

    /// Print the effective configuration as YAML
    Config,
}

#[derive(Args)]
struct CurveArgs {
    /// Print this many evenly spaced rows of the sample table
    #[arg(short, long, default_value = "0")]
    samples: usize,
}

#[derive(Args)]
struct PixelArgs {
    /// Red
    #[arg(allow_hyphen_values = true)]
    r: f32,
    /// Green
    #[arg(allow_hyphen_values = true)]
    g: f32,
    /// Blue
    #[arg(allow_hyphen_values = true)]
    b: f32,

    /// Exposure in stops
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    exposure: f32,
}

#[derive(Args)]
struct LutArgs {
    /// Entries per axis
    #[arg(short, long, default_value = "33")]
    size: usize,

    /// Sample the full 3D transform instead of the neutral curve
    #[arg(long = "3d")]
    three_d: bool,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = commands::build_config(&cli.params)?;

    match cli.command {
        Commands::Curve(args) => commands::curve::run(args, config, cli.verbose),
        Commands::Pixel(args) => commands::pixel::run(args, config, cli.verbose),
        Commands::Lut(args) => commands::lut::run(args, config, cli.verbose),
        Commands::Config => commands::show_config(&config),
    }
}
