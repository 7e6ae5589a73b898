//! Configuration management (tailor.toml)
//!
//! Settings live in the platform config directory unless `--config` names
//! another file. A missing file means defaults; every field has a default so
//! partial files are fine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use tailor_core::TriangulationOptions;
use tailor_library::CatalogConfig;

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "tailor.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Asset catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Triangulation settings
    #[serde(default)]
    pub triangulation: TriangulationConfig,
}

/// Triangulation defaults used when a command does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulationConfig {
    /// Triangles per unit area (default: 1000)
    #[serde(default = "default_density")]
    pub minimum_triangle_density: f64,
    /// Quality bound in degrees, 0 disables it (default: 30)
    #[serde(default = "default_min_angle")]
    pub minimum_angle_degrees: f64,
}

fn default_density() -> f64 {
    1000.0
}
fn default_min_angle() -> f64 {
    30.0
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            minimum_triangle_density: default_density(),
            minimum_angle_degrees: default_min_angle(),
        }
    }
}

impl TriangulationConfig {
    /// Refinement options, with command-line overrides applied.
    pub fn options(&self, density: Option<f64>, min_angle: Option<f64>) -> TriangulationOptions {
        let angle = min_angle.unwrap_or(self.minimum_angle_degrees);
        TriangulationOptions {
            minimum_triangle_density: density.unwrap_or(self.minimum_triangle_density),
            minimum_angle_degrees: (angle > 0.0).then_some(angle),
            max_steiner_points: None,
        }
    }
}

/// The config file path: `explicit` if given, else the platform default.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| tailor_library::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)))
}

/// Load the configuration, falling back to defaults when the file is absent.
///
/// A file that exists but does not parse is an error.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No config directory available, using defaults");
        return Ok(Config::default());
    };

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write the configuration, creating the parent directory if needed.
pub fn save(config: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Write a default config file if none exists
    #[arg(long)]
    pub init: bool,
}

/// Execute the config command
pub fn execute(args: ConfigArgs, path: Option<&Path>) -> Result<()> {
    let path = path.context("No config directory available; pass --config <path>")?;

    if args.init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            save(&Config::default(), path)?;
            println!("Wrote default config: {}", path.display());
        }
        return Ok(());
    }

    let config = load(Some(path))?;
    println!("# {}", path.display());
    print!(
        "{}",
        toml::to_string_pretty(&config).context("Failed to serialize config")?
    );
    Ok(())
}
