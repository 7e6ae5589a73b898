//! Mesh triples handed to the host scene layer
//!
//! Hosts consume `(vertices, edges, faces)`: an outline travels as a single
//! n-gon with explicit boundary edges, a triangulated garment as a plain
//! triangle list with no edges.

use std::io::{self, Write};

use glam::DVec3;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Vertices, edges and arbitrary polygon faces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonMesh {
    /// Vertex positions.
    pub vertices: Vec<DVec3>,
    /// Explicit edges as vertex index pairs.
    pub edges: Vec<[usize; 2]>,
    /// Faces as vertex index loops.
    pub faces: Vec<Vec<usize>>,
}

/// A triangle mesh in the `z = 0` plane, as produced by triangulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<DVec3>,
    /// Counter-clockwise vertex index triples.
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Area of triangle `face`.
    pub fn triangle_area(&self, face: usize) -> f64 {
        let [a, b, c] = self.faces[face].map(|i| self.vertices[i]);
        (b - a).cross(c - a).length() * 0.5
    }

    /// Total surface area.
    pub fn area(&self) -> f64 {
        (0..self.faces.len()).map(|f| self.triangle_area(f)).sum()
    }

    /// Largest triangle area, or 0 for an empty mesh.
    pub fn max_triangle_area(&self) -> f64 {
        (0..self.faces.len())
            .map(|f| self.triangle_area(f))
            .fold(0.0, f64::max)
    }

    /// Edges used by exactly one triangle, with the smaller index first.
    pub fn boundary_edges(&self) -> Vec<[usize; 2]> {
        let mut counts: HashMap<[usize; 2], u32> = HashMap::new();
        for &[a, b, c] in &self.faces {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *counts.entry([u.min(v), u.max(v)]).or_insert(0) += 1;
            }
        }
        let mut edges: Vec<[usize; 2]> = counts
            .into_iter()
            .filter_map(|(edge, count)| (count == 1).then_some(edge))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// The host triple form: no explicit edges, triangles as faces.
    pub fn to_polygon_mesh(&self) -> PolygonMesh {
        PolygonMesh {
            vertices: self.vertices.clone(),
            edges: Vec::new(),
            faces: self.faces.iter().map(|f| f.to_vec()).collect(),
        }
    }

    /// Write the mesh as a Wavefront OBJ object named `name`.
    pub fn write_obj<W: Write>(&self, writer: &mut W, name: &str) -> io::Result<()> {
        writeln!(writer, "o {}", name)?;
        for v in &self.vertices {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for [a, b, c] in &self.faces {
            writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
        }
        Ok(())
    }
}

impl PolygonMesh {
    /// Write the mesh as a Wavefront OBJ object named `name`.
    ///
    /// Edges that are not part of any face are written as `l` lines.
    pub fn write_obj<W: Write>(&self, writer: &mut W, name: &str) -> io::Result<()> {
        writeln!(writer, "o {}", name)?;
        for v in &self.vertices {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }
        if self.faces.is_empty() {
            for [a, b] in &self.edges {
                writeln!(writer, "l {} {}", a + 1, b + 1)?;
            }
        }
        for face in &self.faces {
            let indices: Vec<String> = face.iter().map(|i| (i + 1).to_string()).collect();
            writeln!(writer, "f {}", indices.join(" "))?;
        }
        Ok(())
    }
}
