//! Constrained Delaunay triangulation of planar outlines
//!
//! Outlines are projected onto the XY plane, inserted into a constrained
//! Delaunay triangulation with every boundary edge as a constraint, and
//! refined until no triangle inside the boundary exceeds
//! `1 / minimum_triangle_density` in area. Refinement inserts Steiner points,
//! so output vertex indices bear no fixed relation to input indices.
//!
//! # Example
//!
//! ```
//! use glam::DVec3;
//! use tailor_core::triangulate;
//!
//! let square = [
//!     DVec3::new(0.0, 0.0, 0.0),
//!     DVec3::new(1.0, 0.0, 0.0),
//!     DVec3::new(1.0, 1.0, 0.0),
//!     DVec3::new(0.0, 1.0, 0.0),
//! ];
//! let edges = [[0, 1], [1, 2], [2, 3], [3, 0]];
//! let mesh = triangulate(&square, &edges, 2.0).unwrap();
//! assert!(mesh.num_faces() >= 2);
//! ```

use glam::DVec3;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use spade::{
    AngleLimit, ConstrainedDelaunayTriangulation, Point2, RefinementParameters, RefinementResult,
    Triangulation,
};

use crate::error::TriangulationError;
use crate::mesh::TriangleMesh;

/// Relative slack when checking refined triangles against the area bound.
const AREA_TOLERANCE: f64 = 1e-9;

/// Distance from a segment, relative to its length, below which a vertex counts as on it.
const COLLINEAR_TOLERANCE: f64 = 1e-12;

type Cdt = ConstrainedDelaunayTriangulation<Point2<f64>>;

/// Refinement controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulationOptions {
    /// Triangles per unit area; the maximum triangle area is its reciprocal.
    pub minimum_triangle_density: f64,
    /// Smallest angle refinement aims for, in degrees. `None` disables the
    /// quality bound and refines by area alone.
    pub minimum_angle_degrees: Option<f64>,
    /// Cap on inserted Steiner points. `None` derives a cap from the
    /// outline's bounding box and the area bound.
    pub max_steiner_points: Option<usize>,
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            minimum_triangle_density: 1000.0,
            minimum_angle_degrees: Some(30.0),
            max_steiner_points: None,
        }
    }
}

impl TriangulationOptions {
    /// Default options with the given density.
    pub fn with_density(minimum_triangle_density: f64) -> Self {
        Self {
            minimum_triangle_density,
            ..Self::default()
        }
    }
}

/// Triangulate a closed planar outline with the default 30° quality bound.
///
/// `vertices` must lie in the `z = 0` plane; Z is dropped. `edges` are the
/// boundary segments as vertex index pairs.
pub fn triangulate(
    vertices: &[DVec3],
    edges: &[[usize; 2]],
    minimum_triangle_density: f64,
) -> Result<TriangleMesh, TriangulationError> {
    triangulate_with(
        vertices,
        edges,
        &TriangulationOptions::with_density(minimum_triangle_density),
    )
}

/// Triangulate a closed planar outline with explicit refinement options.
///
/// # Errors
///
/// Fails before refinement on malformed input (too few vertices, edge
/// indices out of range, degenerate or crossing edges, duplicate points,
/// vertices lying inside a boundary edge, invalid coordinates or density),
/// and after refinement when no triangle
/// lies inside the boundary or the area bound could not be met within the
/// Steiner point budget.
pub fn triangulate_with(
    vertices: &[DVec3],
    edges: &[[usize; 2]],
    options: &TriangulationOptions,
) -> Result<TriangleMesh, TriangulationError> {
    let density = options.minimum_triangle_density;
    if !(density.is_finite() && density > 0.0) {
        return Err(TriangulationError::InvalidDensity { density });
    }
    let max_area = 1.0 / density;

    validate_input(vertices, edges)?;
    if vertices.iter().any(|v| v.z != 0.0) {
        tracing::warn!("outline is not planar in z = 0; dropping Z coordinates");
    }

    let mut cdt = Cdt::new();

    let mut handles = Vec::with_capacity(vertices.len());
    for (i, v) in vertices.iter().enumerate() {
        let before = cdt.num_vertices();
        let handle = cdt.insert(Point2::new(v.x, v.y)).map_err(|e| {
            TriangulationError::InvalidCoordinate {
                vertex: i,
                message: format!("{:?}", e),
            }
        })?;
        if cdt.num_vertices() == before {
            let original = handles.iter().position(|&h| h == handle).unwrap_or(i);
            return Err(TriangulationError::DuplicatePoint {
                vertex: i,
                original,
            });
        }
        handles.push(handle);
    }
    check_vertices_off_segments(vertices, edges)?;

    for (i, &[a, b]) in edges.iter().enumerate() {
        let (from, to) = (handles[a], handles[b]);
        if !cdt.can_add_constraint(from, to) {
            return Err(TriangulationError::IntersectingSegments { edge: i });
        }
        cdt.add_constraint(from, to);
    }

    let budget = options
        .max_steiner_points
        .unwrap_or_else(|| steiner_budget(vertices, max_area));

    // A zero angle limit turns off quality refinement.
    let angle_limit = AngleLimit::from_deg(
        options
            .minimum_angle_degrees
            .filter(|degrees| *degrees > 0.0)
            .unwrap_or(0.0),
    );
    let parameters = RefinementParameters::<f64>::new()
        .exclude_outer_faces(true)
        .with_max_allowed_area(max_area)
        .with_angle_limit(angle_limit);

    let result = refine_to_area_bound(&mut cdt, parameters, max_area, vertices.len() + budget);
    let excluded: HashSet<_> = result.excluded_faces.iter().copied().collect();

    let mut faces: Vec<[usize; 3]> = Vec::new();
    for face in cdt.inner_faces() {
        if excluded.contains(&face.fix()) {
            continue;
        }
        faces.push(face.vertices().map(|v| v.fix().index()));
    }
    if faces.is_empty() {
        return Err(TriangulationError::EmptyResult);
    }

    let mesh = compact(&cdt, faces);

    let largest = mesh.max_triangle_area();
    if largest > max_area * (1.0 + AREA_TOLERANCE) {
        return Err(TriangulationError::AreaBoundNotMet {
            area: largest,
            max_area,
        });
    }
    if !result.refinement_complete {
        tracing::warn!(
            budget,
            "Steiner point budget exhausted before the angle bound was met"
        );
    }

    tracing::debug!(
        input_vertices = vertices.len(),
        vertices = mesh.num_vertices(),
        triangles = mesh.num_faces(),
        max_area,
        "triangulated outline"
    );
    Ok(mesh)
}

fn validate_input(vertices: &[DVec3], edges: &[[usize; 2]]) -> Result<(), TriangulationError> {
    let count = vertices.len();
    if count < 3 {
        return Err(TriangulationError::TooFewVertices { count });
    }
    for (i, &[a, b]) in edges.iter().enumerate() {
        if let Some(&vertex) = [a, b].iter().find(|&&v| v >= count) {
            return Err(TriangulationError::EdgeOutOfRange {
                edge: i,
                vertex,
                count,
            });
        }
        if a == b {
            return Err(TriangulationError::DegenerateEdge { edge: i, vertex: a });
        }
    }
    Ok(())
}

/// Reject input vertices that sit inside a boundary segment they do not end.
fn check_vertices_off_segments(
    vertices: &[DVec3],
    edges: &[[usize; 2]],
) -> Result<(), TriangulationError> {
    for (i, &[a, b]) in edges.iter().enumerate() {
        let start = vertices[a].truncate();
        let direction = vertices[b].truncate() - start;
        let length_sq = direction.length_squared();
        for (v, point) in vertices.iter().enumerate() {
            if v == a || v == b {
                continue;
            }
            let offset = point.truncate() - start;
            let along = offset.dot(direction);
            if along <= 0.0 || along >= length_sq {
                continue;
            }
            if direction.perp_dot(offset).abs() <= COLLINEAR_TOLERANCE * length_sq {
                return Err(TriangulationError::VertexOnSegment { vertex: v, edge: i });
            }
        }
    }
    Ok(())
}

/// Refine until no kept triangle exceeds `max_area`, or `vertex_cap` is reached.
///
/// spade skips a triangle whose circumcenter lands on an existing vertex,
/// which can strand triangles above the bound. Their centroids are inserted
/// and refinement runs again.
fn refine_to_area_bound(
    cdt: &mut Cdt,
    parameters: RefinementParameters<f64>,
    max_area: f64,
    vertex_cap: usize,
) -> RefinementResult {
    loop {
        let remaining = vertex_cap.saturating_sub(cdt.num_vertices());
        let result = cdt.refine(parameters.clone().with_max_additional_vertices(remaining));
        let excluded: HashSet<_> = result.excluded_faces.iter().copied().collect();

        let stranded: Vec<Point2<f64>> = cdt
            .inner_faces()
            .filter(|face| !excluded.contains(&face.fix()))
            .filter(|face| face.area() > max_area * (1.0 + AREA_TOLERANCE))
            .map(|face| face.center())
            .collect();
        if stranded.is_empty() || cdt.num_vertices() + stranded.len() > vertex_cap {
            return result;
        }

        tracing::trace!(count = stranded.len(), "splitting triangles left above the area bound");
        let before = cdt.num_vertices();
        for centroid in stranded {
            if let Err(e) = cdt.insert(centroid) {
                tracing::warn!("could not insert centroid {:?}: {:?}", centroid, e);
            }
        }
        if cdt.num_vertices() == before {
            return result;
        }
    }
}

/// Steiner point cap: generous multiple of the triangles the bounding box needs.
fn steiner_budget(vertices: &[DVec3], max_area: f64) -> usize {
    let (min, max) = vertices.iter().fold(
        (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
        |(lo, hi), v| (lo.min(*v), hi.max(*v)),
    );
    let extent = max - min;
    let estimate = (extent.x * extent.y / max_area).ceil() as usize;
    estimate
        .saturating_mul(8)
        .saturating_add(10 * vertices.len() + 256)
}

/// Keep only vertices referenced by `faces`, preserving their relative order.
fn compact(
    cdt: &Cdt,
    faces: Vec<[usize; 3]>,
) -> TriangleMesh {
    let mut remap = vec![usize::MAX; cdt.num_vertices()];
    for face in &faces {
        for &v in face {
            remap[v] = 0;
        }
    }

    let mut vertices = Vec::new();
    for vertex in cdt.vertices() {
        let index = vertex.fix().index();
        if remap[index] == usize::MAX {
            continue;
        }
        remap[index] = vertices.len();
        let p = vertex.position();
        vertices.push(DVec3::new(p.x, p.y, 0.0));
    }

    let faces = faces
        .into_iter()
        .map(|face| face.map(|v| remap[v]))
        .collect();
    TriangleMesh { vertices, faces }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garment::{TowelSpec, build_towel_outline};

    fn unit_square() -> (Vec<DVec3>, Vec<[usize; 2]>) {
        (
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 0.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1], [1, 2], [2, 3], [3, 0]],
        )
    }

    #[test]
    fn test_unit_square_density_two() {
        let (vertices, edges) = unit_square();
        let mesh = triangulate(&vertices, &edges, 2.0).unwrap();
        assert!(mesh.num_faces() >= 2);
        for f in 0..mesh.num_faces() {
            assert!(mesh.triangle_area(f) <= 0.5 + 1e-9);
        }
        assert!((mesh.area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_density_controls_triangle_count() {
        let (vertices, edges) = unit_square();
        let coarse = triangulate(&vertices, &edges, 10.0).unwrap();
        let fine = triangulate(&vertices, &edges, 200.0).unwrap();
        assert!(fine.num_faces() > coarse.num_faces());
        assert!(fine.num_faces() >= 200);
        assert!(fine.max_triangle_area() <= 1.0 / 200.0 + 1e-9);
    }

    #[test]
    fn test_area_only_refinement() {
        let (vertices, edges) = unit_square();
        let options = TriangulationOptions {
            minimum_triangle_density: 50.0,
            minimum_angle_degrees: None,
            max_steiner_points: None,
        };
        let mesh = triangulate_with(&vertices, &edges, &options).unwrap();
        assert!(mesh.max_triangle_area() <= 0.02 + 1e-9);
    }

    #[test]
    fn test_output_is_flat() {
        let (vertices, edges) = unit_square();
        let mesh = triangulate(&vertices, &edges, 100.0).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.z == 0.0));
        assert!(mesh.vertices.len() > vertices.len());
    }

    #[test]
    fn test_concave_outline_excludes_notch() {
        // L-shape: the missing quadrant must stay empty.
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(2.0, 1.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(1.0, 2.0, 0.0),
            DVec3::new(0.0, 2.0, 0.0),
        ];
        let edges: Vec<[usize; 2]> = (0..6).map(|i| [i, (i + 1) % 6]).collect();
        let mesh = triangulate(&vertices, &edges, 20.0).unwrap();
        assert!((mesh.area() - 3.0).abs() < 1e-9);
        for face in &mesh.faces {
            let centroid = face.iter().map(|&i| mesh.vertices[i]).sum::<DVec3>() / 3.0;
            assert!(!(centroid.x > 1.0 && centroid.y > 1.0));
        }
    }

    #[test]
    fn test_rejects_invalid_density() {
        let (vertices, edges) = unit_square();
        for density in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                triangulate(&vertices, &edges, density),
                Err(TriangulationError::InvalidDensity { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_too_few_vertices() {
        let vertices = vec![DVec3::ZERO, DVec3::X];
        assert_eq!(
            triangulate(&vertices, &[[0, 1]], 1.0),
            Err(TriangulationError::TooFewVertices { count: 2 })
        );
    }

    #[test]
    fn test_rejects_bad_edges() {
        let (vertices, _) = unit_square();
        assert_eq!(
            triangulate(&vertices, &[[0, 1], [1, 7]], 1.0),
            Err(TriangulationError::EdgeOutOfRange {
                edge: 1,
                vertex: 7,
                count: 4
            })
        );
        assert_eq!(
            triangulate(&vertices, &[[2, 2]], 1.0),
            Err(TriangulationError::DegenerateEdge { edge: 0, vertex: 2 })
        );
    }

    #[test]
    fn test_rejects_duplicate_points() {
        let (mut vertices, mut edges) = unit_square();
        vertices.push(DVec3::new(1.0, 1.0, 0.0));
        edges.push([3, 4]);
        assert_eq!(
            triangulate(&vertices, &edges, 1.0),
            Err(TriangulationError::DuplicatePoint {
                vertex: 4,
                original: 2
            })
        );
    }

    #[test]
    fn test_rejects_self_intersection() {
        // Bow tie: edges 0-1 and 2-3 cross.
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        let edges = vec![[0, 1], [1, 2], [2, 3], [3, 0]];
        assert_eq!(
            triangulate(&vertices, &edges, 1.0),
            Err(TriangulationError::IntersectingSegments { edge: 2 })
        );
    }

    #[test]
    fn test_unconstrained_points_have_no_interior() {
        let (vertices, _) = unit_square();
        let edges: Vec<[usize; 2]> = Vec::new();
        assert_eq!(
            triangulate(&vertices, &edges, 1.0),
            Err(TriangulationError::EmptyResult)
        );
    }

    #[test]
    fn test_rejects_vertex_on_boundary_edge() {
        // Vertex 4 sits in the middle of edge 0 without splitting it.
        let (mut vertices, mut edges) = unit_square();
        vertices.push(DVec3::new(0.5, 0.0, 0.0));
        edges.push([2, 4]);
        assert_eq!(
            triangulate(&vertices, &edges, 1.0),
            Err(TriangulationError::VertexOnSegment { vertex: 4, edge: 0 })
        );
    }

    #[test]
    fn test_collinear_neighbours_are_accepted() {
        // Splitting the bottom edge at its midpoint is a valid boundary.
        let vertices = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(0.5, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        let edges: Vec<[usize; 2]> = (0..5).map(|i| [i, (i + 1) % 5]).collect();
        let mesh = triangulate(&vertices, &edges, 10.0).unwrap();
        assert!((mesh.area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_bound_met_where_refinement_stalls() {
        // spade leaves 1/64-area triangles on this rectangle at density 100.
        let towel = build_towel_outline(&TowelSpec {
            width: 1.7879510348325505,
            length: 1.5323803965758258,
        })
        .unwrap();
        for minimum_angle_degrees in [Some(30.0), None] {
            let options = TriangulationOptions {
                minimum_triangle_density: 100.0,
                minimum_angle_degrees,
                max_steiner_points: None,
            };
            let mesh = triangulate_with(towel.vertices(), &towel.edges(), &options).unwrap();
            assert!(mesh.max_triangle_area() <= 0.01 * (1.0 + 1e-9));
            assert!((mesh.area() - towel.signed_area().abs()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_nan_coordinate() {
        let (mut vertices, edges) = unit_square();
        vertices[1].y = f64::NAN;
        assert!(matches!(
            triangulate(&vertices, &edges, 1.0),
            Err(TriangulationError::InvalidCoordinate { vertex: 1, .. })
        ));
    }

    #[test]
    fn test_tiny_budget_reports_area_failure() {
        let (vertices, edges) = unit_square();
        let options = TriangulationOptions {
            minimum_triangle_density: 1000.0,
            minimum_angle_degrees: None,
            max_steiner_points: Some(1),
        };
        assert!(matches!(
            triangulate_with(&vertices, &edges, &options),
            Err(TriangulationError::AreaBoundNotMet { .. })
        ));
    }
}
