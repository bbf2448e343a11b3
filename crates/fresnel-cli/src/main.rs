//! fresnel CLI - Fresnel lens mesh generator
//!
//! Builds the faceted lens mesh from command-line flags and/or a TOML file
//! and writes it as STL or OBJ.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fresnel_export::ExportFormat;
use fresnel_kernel::{EffectiveRadius, LensParams};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "fresnel")]
#[command(about = "Generate faceted Fresnel lens meshes", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the lens mesh and write it to a file
    Generate(GenerateArgs),
    /// Print per-cell optics and mesh statistics
    Info(InfoArgs),
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    lens: LensArgs,

    /// Output file (format from extension: .stl, .obj)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force the output format (stl, ascii, obj)
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Solid name for ASCII STL and OBJ (default: output file stem)
    #[arg(long)]
    name: Option<String>,

    /// Generate on a single thread
    #[arg(long)]
    serial: bool,
}

#[derive(Args)]
struct InfoArgs {
    #[command(flatten)]
    lens: LensArgs,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Lens flags; any flag given here overrides the config file.
#[derive(Args, Debug, Default)]
struct LensArgs {
    /// TOML file with [lens] and [output] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Aperture width in mm
    #[arg(long)]
    width: Option<f64>,

    /// Aperture height in mm
    #[arg(long)]
    height: Option<f64>,

    /// Square aperture side in mm (instead of width/height)
    #[arg(short, long)]
    diameter: Option<f64>,

    /// Focal length in mm
    #[arg(short, long)]
    focal_length: Option<f64>,

    /// Refractive index of the material [default: 1.5]
    #[arg(short = 'n', long)]
    refractive_index: Option<f64>,

    /// Prisms per row and column
    #[arg(short, long)]
    prisms: Option<u32>,

    /// Prism pitch in mm (instead of --prisms)
    #[arg(long)]
    prism_pitch: Option<f64>,

    /// Facets per prism [default: 1]
    #[arg(long)]
    facets: Option<u32>,

    /// Back-plane depth in mm [default: 2]
    #[arg(short, long)]
    thickness: Option<f64>,

    /// Effective-radius model [default: linear]
    #[arg(short, long, value_enum)]
    mode: Option<RadiusMode>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RadiusMode {
    Linear,
    Radial,
}

impl From<RadiusMode> for EffectiveRadius {
    fn from(mode: RadiusMode) -> Self {
        match mode {
            RadiusMode::Linear => EffectiveRadius::Linear,
            RadiusMode::Radial => EffectiveRadius::Radial,
        }
    }
}

impl LensArgs {
    fn to_params(&self) -> LensParams {
        LensParams {
            width: self.width,
            height: self.height,
            diameter: self.diameter,
            focal_length: self.focal_length,
            refractive_index: self.refractive_index,
            n_prisms: self.prisms,
            prism_pitch: self.prism_pitch,
            n_facets: self.facets,
            thickness: self.thickness,
            effective_radius_mode: self.mode.map(Into::into),
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate(args) => commands::generate(&args)?,
        Commands::Info(args) => commands::info(&args)?,
    }

    Ok(())
}
