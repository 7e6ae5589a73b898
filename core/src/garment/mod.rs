//! Garment outline generation
//!
//! Every garment is built the same way: the right half of the pattern is
//! placed explicitly, then mirrored across X = 0 and appended in reverse
//! order. The result is a single closed, non-self-intersecting loop whose
//! vertex indices double as keypoint indices.
//!
//! # Example
//!
//! ```
//! use tailor_core::garment::{ShirtSpec, build_shirt_outline};
//!
//! let outline = build_shirt_outline(&ShirtSpec::default()).unwrap();
//! assert_eq!(outline.len(), 13);
//! assert!(outline.keypoint("armpit_left").is_some());
//! ```

mod pants;
mod shirt;
mod towel;

pub use pants::{PANTS_KEYPOINTS, PantsSpec, build_pants_outline};
pub use shirt::{SHIRT_KEYPOINTS, ShirtSpec, ShoulderPlacement, build_shirt_outline};
pub use towel::{TOWEL_KEYPOINTS, TowelSpec, build_towel_outline};

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use glam::{DVec2, DVec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::mesh::PolygonMesh;

/// A keypoint category in COCO annotation style.
///
/// Category ids follow DeepFashion2, with 14 added for towels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeypointCategory {
    /// Always `"clothes"` for garments.
    pub supercategory: &'static str,
    /// Numeric category id.
    pub id: u32,
    /// Category name.
    pub name: &'static str,
    /// Keypoint labels, in vertex order.
    pub keypoints: &'static [&'static str],
}

/// Shirt with sleeves no longer than half the body height.
pub const SHORT_SLEEVED_SHIRT: KeypointCategory = KeypointCategory {
    supercategory: "clothes",
    id: 1,
    name: "short_sleeved_shirt",
    keypoints: &SHIRT_KEYPOINTS,
};

/// Shirt with sleeves longer than half the body height.
pub const LONG_SLEEVED_SHIRT: KeypointCategory = KeypointCategory {
    supercategory: "clothes",
    id: 2,
    name: "long_sleeved_shirt",
    keypoints: &SHIRT_KEYPOINTS,
};

/// Pants.
pub const TROUSERS: KeypointCategory = KeypointCategory {
    supercategory: "clothes",
    id: 8,
    name: "trousers",
    keypoints: &PANTS_KEYPOINTS,
};

/// Rectangular towel.
pub const TOWEL: KeypointCategory = KeypointCategory {
    supercategory: "clothes",
    id: 14,
    name: "towel",
    keypoints: &TOWEL_KEYPOINTS,
};

/// A closed garment boundary with labelled vertices.
///
/// Vertex `i` connects to vertex `i + 1`, and the last vertex connects back
/// to vertex 0. All vertices lie in the `z = 0` plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outline {
    category: KeypointCategory,
    vertices: Vec<DVec3>,
}

impl Outline {
    pub(crate) fn new(category: KeypointCategory, vertices: Vec<DVec3>) -> Self {
        debug_assert_eq!(vertices.len(), category.keypoints.len());
        Self { category, vertices }
    }

    /// The keypoint category this outline annotates as.
    pub fn category(&self) -> &KeypointCategory {
        &self.category
    }

    /// Ordered boundary vertices.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the outline has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Boundary edges `(i, i + 1)`, closing with `(n - 1, 0)`.
    pub fn edges(&self) -> Vec<[usize; 2]> {
        let n = self.vertices.len();
        (0..n).map(|i| [i, (i + 1) % n]).collect()
    }

    /// Position of the keypoint with the given label.
    pub fn keypoint(&self, name: &str) -> Option<DVec3> {
        self.category
            .keypoints
            .iter()
            .position(|&label| label == name)
            .map(|i| self.vertices[i])
    }

    /// `(label, position)` pairs in keypoint order.
    pub fn keypoints(&self) -> impl Iterator<Item = (&'static str, DVec3)> + '_ {
        self.category
            .keypoints
            .iter()
            .copied()
            .zip(self.vertices.iter().copied())
    }

    /// Signed area of the polygon in the XY plane (positive when counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice * 0.5
    }

    /// Whether the boundary is a simple polygon: edges meet only where
    /// neighbours share a vertex, and no edge folds back onto the next.
    pub fn is_simple(&self) -> bool {
        let n = self.vertices.len();
        let point = |i: usize| self.vertices[i % n].truncate();
        for i in 0..n {
            for j in i + 1..n {
                let (p1, p2) = (point(i), point(i + 1));
                let (q1, q2) = (point(j), point(j + 1));
                let touches = if j == i + 1 {
                    on_segment(p1, q1, q2) || on_segment(q2, p1, p2)
                } else if i == 0 && j == n - 1 {
                    on_segment(p2, q1, q2) || on_segment(q1, p1, p2)
                } else {
                    segments_touch(p1, p2, q1, q2)
                };
                if touches {
                    return false;
                }
            }
        }
        true
    }

    /// The outline as a host mesh triple: boundary edges plus one n-gon face.
    pub fn to_polygon_mesh(&self) -> PolygonMesh {
        PolygonMesh {
            vertices: self.vertices.clone(),
            edges: self.edges(),
            faces: vec![(0..self.vertices.len()).collect()],
        }
    }
}

/// Garment families that can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentKind {
    /// T-shirt or long-sleeved shirt.
    Shirt,
    /// Pants.
    Pants,
    /// Rectangular towel.
    Towel,
}

impl GarmentKind {
    /// All garment kinds.
    pub const ALL: [GarmentKind; 3] = [GarmentKind::Shirt, GarmentKind::Pants, GarmentKind::Towel];

    /// Lowercase name used in file names and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentKind::Shirt => "shirt",
            GarmentKind::Pants => "pants",
            GarmentKind::Towel => "towel",
        }
    }
}

impl fmt::Display for GarmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GarmentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        GarmentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown garment '{}', expected shirt, pants or towel", s))
    }
}

/// Parameters for any supported garment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GarmentSpec {
    /// Shirt parameters.
    Shirt(ShirtSpec),
    /// Pants parameters.
    Pants(PantsSpec),
    /// Towel parameters.
    Towel(TowelSpec),
}

impl GarmentSpec {
    /// Default parameters for a garment kind.
    pub fn default_for(kind: GarmentKind) -> Self {
        match kind {
            GarmentKind::Shirt => GarmentSpec::Shirt(ShirtSpec::default()),
            GarmentKind::Pants => GarmentSpec::Pants(PantsSpec::default()),
            GarmentKind::Towel => GarmentSpec::Towel(TowelSpec::default()),
        }
    }

    /// Random parameters for a garment kind, drawn from its usual ranges.
    pub fn sample<R: Rng + ?Sized>(kind: GarmentKind, rng: &mut R) -> Self {
        match kind {
            GarmentKind::Shirt => GarmentSpec::Shirt(ShirtSpec::sample(rng)),
            GarmentKind::Pants => GarmentSpec::Pants(PantsSpec::sample(rng)),
            GarmentKind::Towel => GarmentSpec::Towel(TowelSpec::sample(rng)),
        }
    }

    /// Which garment these parameters describe.
    pub fn kind(&self) -> GarmentKind {
        match self {
            GarmentSpec::Shirt(_) => GarmentKind::Shirt,
            GarmentSpec::Pants(_) => GarmentKind::Pants,
            GarmentSpec::Towel(_) => GarmentKind::Towel,
        }
    }

    /// Build the outline for these parameters.
    pub fn build_outline(&self) -> Result<Outline> {
        match self {
            GarmentSpec::Shirt(spec) => build_shirt_outline(spec),
            GarmentSpec::Pants(spec) => build_pants_outline(spec),
            GarmentSpec::Towel(spec) => build_towel_outline(spec),
        }
    }
}

/// Append the mirror image of `half[mirrored]` across X = 0, in reverse order.
fn mirror_half(mut half: Vec<DVec3>, mirrored: Range<usize>) -> Vec<DVec3> {
    let reflected: Vec<DVec3> = half[mirrored]
        .iter()
        .rev()
        .map(|v| DVec3::new(-v.x, v.y, v.z))
        .collect();
    half.extend(reflected);
    half
}

/// Shift every vertex down by `offset_y`, then scale uniformly.
fn recenter_and_scale(vertices: &mut [DVec3], offset_y: f64, scale: f64) {
    for v in vertices.iter_mut() {
        v.y -= offset_y;
        *v *= scale;
    }
}

fn on_segment(point: DVec2, start: DVec2, end: DVec2) -> bool {
    let direction = end - start;
    let offset = point - start;
    let length_sq = direction.length_squared();
    let along = offset.dot(direction);
    direction.perp_dot(offset).abs() <= 1e-12 * length_sq && (0.0..=length_sq).contains(&along)
}

fn segments_touch(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let side = |a: DVec2, b: DVec2, c: DVec2| (b - a).perp_dot(c - a);
    let straddles = |s1: f64, s2: f64| (s1 > 0.0 && s2 < 0.0) || (s1 < 0.0 && s2 > 0.0);
    if straddles(side(q1, q2, p1), side(q1, q2, p2)) && straddles(side(p1, p2, q1), side(p1, p2, q2))
    {
        return true;
    }
    on_segment(p1, q1, q2) || on_segment(p2, q1, q2) || on_segment(q1, p1, p2) || on_segment(q2, p1, p2)
}

fn require_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::invalid_param(
            name,
            value,
            "must be positive and finite",
        ))
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::invalid_param(name, value, "must be finite"))
    }
}
