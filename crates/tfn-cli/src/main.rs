//! tfn - transfer function tool
//!
//! Lists presets, inspects and converts transfer function files, replays
//! edit scripts, and bakes palettes for render hosts.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tfn_core::{EditorConfig, SampleSpacing};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tfn")]
#[command(author, version, about = "Transfer function editing and baking tool")]
#[command(long_about = "
Works with piecewise-linear color/opacity transfer functions.

Examples:
  tfn presets                              # List built-in presets
  tfn info bone.tfn                        # Show curve summary
  tfn convert bone.tfn bone.json           # Change file format
  tfn bake --preset jet -n 256 -o jet.png  # Palette strip
  tfn bake bone.json -o bone.raw           # Raw f32 RGBA samples
  tfn edit --preset default -s edits.json -o mine.json
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Editor config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in presets
    Presets,

    /// Show a transfer function's curves
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Convert between .json and .tfn
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Sample a transfer function into a palette
    #[command(visible_alias = "b")]
    Bake(BakeArgs),

    /// Apply a script of edit commands and save the result
    Edit(EditArgs),
}

/// Where a transfer function comes from: a file or a preset.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Source {
    /// Transfer function file (.json or .tfn)
    input: Option<PathBuf>,

    /// Built-in preset name (e.g. "jet", "cool warm")
    #[arg(short, long)]
    preset: Option<String>,
}

#[derive(Args)]
struct InfoArgs {
    /// Input file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// List every control point
    #[arg(short, long)]
    points: bool,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input file
    input: PathBuf,

    /// Output file; format follows the extension
    output: PathBuf,
}

#[derive(Args)]
struct BakeArgs {
    #[command(flatten)]
    source: Source,

    /// Palette length (defaults to the config value)
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Sample placement along the curve domain
    #[arg(long, value_enum)]
    spacing: Option<Spacing>,

    /// Output file: .png strip, .json sample list, or .raw f32 RGBA
    #[arg(short, long)]
    output: PathBuf,

    /// PNG strip height in pixels
    #[arg(long, default_value = "16")]
    height: u32,

    /// Also write the pre-integrated table as an N x N PNG next to the output
    #[arg(long)]
    pre_integrate: bool,
}

#[derive(Args)]
struct EditArgs {
    #[command(flatten)]
    source: Source,

    /// JSON array of edit commands
    #[arg(short, long)]
    script: PathBuf,

    /// Output file (.json or .tfn)
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Spacing {
    /// k / (N - 1): first and last samples hit the curve ends
    Inclusive,
    /// k / N: the last sample stops short of 1
    HalfOpen,
}

impl From<Spacing> for SampleSpacing {
    fn from(s: Spacing) -> Self {
        match s {
            Spacing::Inclusive => SampleSpacing::Inclusive,
            Spacing::HalfOpen => SampleSpacing::HalfOpen,
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::Presets => commands::presets::run(),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Convert(args) => commands::convert::run(args, &config),
        Commands::Bake(args) => commands::bake::run(args, &config),
        Commands::Edit(args) => commands::edit::run(args, &config),
    }
}
