//! Output formats shared by the garment, triangulate and batch commands

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tailor_core::garment::{GarmentSpec, KeypointCategory, Outline};
use tailor_core::glam::DVec3;
use tailor_core::mesh::{PolygonMesh, TriangleMesh};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Wavefront OBJ
    #[default]
    Obj,
    /// JSON document with keypoints and the mesh triple
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Obj => "obj",
            OutputFormat::Json => "json",
        }
    }
}

/// Output options common to garment commands.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Triangulate the outline using the configured density
    #[arg(long)]
    pub triangulate: bool,

    /// Triangles per unit area (implies --triangulate)
    #[arg(long)]
    pub density: Option<f64>,

    /// Minimum triangle angle in degrees, 0 disables (implies --triangulate)
    #[arg(long)]
    pub min_angle: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Obj)]
    pub format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

impl OutputArgs {
    /// Whether the outline should be triangulated.
    pub fn wants_mesh(&self) -> bool {
        self.triangulate || self.density.is_some() || self.min_angle.is_some()
    }
}

/// A labelled vertex.
#[derive(Debug, Serialize)]
pub struct Keypoint<'a> {
    pub name: &'a str,
    pub position: DVec3,
}

/// JSON form of a generated garment.
///
/// The mesh triple is flattened to the top level, so the document doubles
/// as input to `tailor triangulate`.
#[derive(Debug, Serialize)]
pub struct GarmentDocument<'a> {
    pub spec: &'a GarmentSpec,
    pub category: &'a KeypointCategory,
    pub keypoints: Vec<Keypoint<'a>>,
    #[serde(flatten)]
    pub mesh: PolygonMesh,
}

impl<'a> GarmentDocument<'a> {
    pub fn new(spec: &'a GarmentSpec, outline: &'a Outline, mesh: Option<&TriangleMesh>) -> Self {
        Self {
            spec,
            category: outline.category(),
            keypoints: outline
                .keypoints()
                .map(|(name, position)| Keypoint { name, position })
                .collect(),
            mesh: match mesh {
                Some(mesh) => mesh.to_polygon_mesh(),
                None => outline.to_polygon_mesh(),
            },
        }
    }
}

/// Open `path` for writing, or stdout when `None`.
pub fn open(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Write a garment as OBJ (triangles if meshed, else the outline n-gon) or JSON.
pub fn write_garment<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    name: &str,
    spec: &GarmentSpec,
    outline: &Outline,
    mesh: Option<&TriangleMesh>,
) -> Result<()> {
    match format {
        OutputFormat::Obj => match mesh {
            Some(mesh) => mesh.write_obj(writer, name)?,
            None => outline.to_polygon_mesh().write_obj(writer, name)?,
        },
        OutputFormat::Json => {
            let doc = GarmentDocument::new(spec, outline, mesh);
            serde_json::to_writer_pretty(&mut *writer, &doc)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write a bare triangle mesh as OBJ or as a JSON mesh triple.
pub fn write_mesh<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    name: &str,
    mesh: &TriangleMesh,
) -> Result<()> {
    match format {
        OutputFormat::Obj => mesh.write_obj(writer, name)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, &mesh.to_polygon_mesh())?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}
