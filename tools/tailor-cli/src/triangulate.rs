//! Triangulate command - mesh an outline read from JSON

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use tailor_core::glam::DVec3;
use tailor_core::triangulate_with;

use crate::config::Config;
use crate::output::{self, OutputFormat};

/// Arguments for the triangulate command
#[derive(Args, Debug)]
pub struct TriangulateArgs {
    /// JSON outline with `vertices` and optional `edges` (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Triangles per unit area (defaults to the configured density)
    #[arg(long)]
    pub density: Option<f64>,

    /// Minimum triangle angle in degrees, 0 disables
    #[arg(long)]
    pub min_angle: Option<f64>,

    /// Upper bound on inserted points
    #[arg(long)]
    pub max_steiner_points: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Obj)]
    pub format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Outline document accepted on input.
///
/// Vertices are `[x, y, z]` triples. Without `edges` the vertices are taken
/// as a closed loop in order. Other keys (such as those written by
/// `tailor shirt --format json`) are ignored.
#[derive(Debug, Deserialize)]
pub struct OutlineDocument {
    pub vertices: Vec<DVec3>,
    #[serde(default)]
    pub edges: Option<Vec<[usize; 2]>>,
}

impl OutlineDocument {
    /// Parse an outline document.
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse outline JSON")
    }

    /// Boundary edges, defaulting to the closed loop through all vertices.
    pub fn edges(&self) -> Vec<[usize; 2]> {
        match &self.edges {
            Some(edges) => edges.clone(),
            None => {
                let n = self.vertices.len();
                (0..n).map(|i| [i, (i + 1) % n]).collect()
            }
        }
    }
}

/// Execute the triangulate command
pub fn execute(args: TriangulateArgs, config: &Config) -> Result<()> {
    let content = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read outline from stdin")?;
            buf
        }
    };
    let doc = OutlineDocument::parse(&content)?;

    let mut options = config.triangulation.options(args.density, args.min_angle);
    options.max_steiner_points = args.max_steiner_points;

    let mesh = triangulate_with(&doc.vertices, &doc.edges(), &options)
        .context("Triangulation failed")?;
    tracing::info!(
        "Triangulated {} boundary vertices into {} triangles ({} vertices)",
        doc.vertices.len(),
        mesh.num_faces(),
        mesh.num_vertices()
    );

    let name = args
        .input
        .as_deref()
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or("outline");
    let mut writer = output::open(args.output.as_deref())?;
    output::write_mesh(&mut writer, args.format, name, &mesh)
}
