//! Tailor CLI - garment patterns and asset library tooling
//!
//! # Commands
//!
//! - `tailor shirt|pants|towel` - Build one garment outline (optionally triangulated)
//! - `tailor triangulate` - Triangulate a JSON `{vertices, edges}` outline
//! - `tailor batch` - Sample and build many garments in parallel
//! - `tailor assets` - Inspect and refresh the asset library cache
//! - `tailor config` - Show or initialise `tailor.toml`
//!
//! # Usage
//!
//! ```bash
//! # Default shirt as an OBJ polygon on stdout
//! tailor shirt
//!
//! # Long-sleeved shirt, triangulated at 2000 triangles per unit area
//! tailor shirt --sleeve-length 0.9 --density 2000 --output shirt.obj
//!
//! # Pipe a garment into the triangulator
//! tailor towel --format json | tailor triangulate --density 500
//!
//! # 100 random pants, one OBJ and one keypoint file each
//! tailor batch --garment pants --count 100 --seed 7 --out-dir out/
//!
//! # Outdoor worlds from the configured libraries
//! tailor assets list --type worlds --tag outdoor
//! ```
//!
//! # Configuration (tailor.toml)
//!
//! ```toml
//! [[catalog.libraries]]
//! name = "Studio"
//! root_path = "/srv/assets"
//!
//! [triangulation]
//! minimum_triangle_density = 1000.0
//! minimum_angle_degrees = 30.0
//! ```

mod assets;
mod batch;
mod config;
mod garment;
mod output;
mod triangulate;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Tailor CLI - garment patterns and asset library tooling
#[derive(Parser)]
#[command(name = "tailor")]
#[command(about = "Procedural garment patterns and asset library tooling")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to tailor.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a shirt outline
    Shirt(garment::ShirtArgs),

    /// Build a pants outline
    Pants(garment::PantsArgs),

    /// Build a towel outline
    Towel(garment::TowelArgs),

    /// Triangulate a JSON outline
    Triangulate(triangulate::TriangulateArgs),

    /// Sample and build many garments in parallel
    Batch(batch::BatchArgs),

    /// Inspect and refresh the asset library cache
    #[command(subcommand)]
    Assets(assets::AssetsCommand),

    /// Show or initialise the configuration file
    Config(config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = config::resolve_path(cli.config.as_deref());
    let load_config = || config::load(config_path.as_deref());

    match cli.command {
        Commands::Shirt(args) => garment::execute_shirt(args, &load_config()?),
        Commands::Pants(args) => garment::execute_pants(args, &load_config()?),
        Commands::Towel(args) => garment::execute_towel(args, &load_config()?),
        Commands::Triangulate(args) => triangulate::execute(args, &load_config()?),
        Commands::Batch(args) => batch::execute(args, &load_config()?),
        Commands::Assets(command) => assets::execute(command, &load_config()?),
        Commands::Config(args) => config::execute(args, config_path.as_deref()),
    }
}
