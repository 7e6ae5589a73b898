//! Error types for outline generation and triangulation.

use thiserror::Error;

/// Result type alias using [`GeometryError`].
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Errors raised while turning a garment spec into an outline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The parameters violate a geometric precondition of the construction.
    #[error("invalid garment geometry: {reason}")]
    InvalidGeometry {
        /// What went wrong.
        reason: String,
    },

    /// A single parameter is out of its valid domain.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl GeometryError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        GeometryError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Errors raised by [`crate::triangulate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriangulationError {
    /// Fewer than three input vertices.
    #[error("outline has {count} vertices, at least 3 are required")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },

    /// A boundary edge references a vertex that does not exist.
    #[error("edge {edge} references vertex {vertex}, but only {count} vertices exist")]
    EdgeOutOfRange {
        /// Index of the offending edge.
        edge: usize,
        /// The invalid vertex index.
        vertex: usize,
        /// Number of vertices supplied.
        count: usize,
    },

    /// A boundary edge starts and ends at the same vertex.
    #[error("edge {edge} is degenerate (both ends are vertex {vertex})")]
    DegenerateEdge {
        /// Index of the offending edge.
        edge: usize,
        /// The repeated vertex index.
        vertex: usize,
    },

    /// Two input vertices share the same 2D position.
    #[error("vertex {vertex} duplicates the position of vertex {original}")]
    DuplicatePoint {
        /// The duplicate vertex.
        vertex: usize,
        /// The vertex first inserted at that position.
        original: usize,
    },

    /// A boundary edge crosses another boundary edge.
    #[error("edge {edge} intersects another boundary edge")]
    IntersectingSegments {
        /// Index of the edge that could not be inserted.
        edge: usize,
    },

    /// An input vertex lies inside a boundary edge it is not an end of.
    #[error("vertex {vertex} lies on boundary edge {edge}")]
    VertexOnSegment {
        /// The vertex touching the edge.
        vertex: usize,
        /// Index of the edge it touches.
        edge: usize,
    },

    /// A coordinate could not be inserted (NaN, infinite or out of range).
    #[error("vertex {vertex} has an invalid coordinate: {message}")]
    InvalidCoordinate {
        /// The offending vertex.
        vertex: usize,
        /// Message from the triangulation backend.
        message: String,
    },

    /// The requested density is not a positive finite number.
    #[error("minimum triangle density must be positive and finite, got {density}")]
    InvalidDensity {
        /// The rejected density.
        density: f64,
    },

    /// No triangle lies inside the boundary, usually because it is not closed.
    #[error("no triangles lie inside the boundary; is the outline closed?")]
    EmptyResult,

    /// Refinement stopped before every triangle met the area bound.
    #[error("refinement left a triangle of area {area} above the bound {max_area}")]
    AreaBoundNotMet {
        /// Largest remaining triangle area.
        area: f64,
        /// Requested maximum area.
        max_area: f64,
    },
}
