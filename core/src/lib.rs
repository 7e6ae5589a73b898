//! # Tailor core
//!
//! Procedural garment patterns for cloth simulation datasets.
//!
//! Two pieces make up the geometry pipeline:
//!
//! - **Outline generation** ([`garment`]): shirts, pants and towels are
//!   described by a handful of semantic parameters and turned into closed,
//!   mirror-symmetric polygons whose vertices double as labelled keypoints.
//! - **Triangulation** ([`triangulate()`]): a closed outline is turned into a
//!   conforming Delaunay mesh whose triangles respect a maximum area.
//!
//! Both steps are pure functions with no shared state, so independent
//! garments can be built on as many threads as you like.
//!
//! ```
//! use tailor_core::prelude::*;
//!
//! let outline = build_shirt_outline(&ShirtSpec::default()).unwrap();
//! let mesh = triangulate(outline.vertices(), &outline.edges(), 500.0).unwrap();
//! assert!(mesh.max_triangle_area() <= 1.0 / 500.0 + 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod garment;
pub mod mesh;
pub mod triangulate;

pub use triangulate::{TriangulationOptions, triangulate, triangulate_with};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{GeometryError, TriangulationError};
    pub use crate::garment::{
        GarmentKind, GarmentSpec, KeypointCategory, Outline, PantsSpec, ShirtSpec,
        ShoulderPlacement, TowelSpec, build_pants_outline, build_shirt_outline,
        build_towel_outline,
    };
    pub use crate::mesh::{PolygonMesh, TriangleMesh};
    pub use crate::triangulate::{TriangulationOptions, triangulate, triangulate_with};
}

// Re-export glam so callers can build input points without a direct dependency.
pub use glam;
