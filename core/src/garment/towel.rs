//! Rectangular towel outline

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Outline, TOWEL, require_positive};
use crate::error::Result;

/// Keypoint labels of a towel outline, in vertex order.
pub const TOWEL_KEYPOINTS: [&str; 4] = ["corner0", "corner1", "corner2", "corner3"];

/// Parameters of a rectangular towel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowelSpec {
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub length: f64,
}

impl Default for TowelSpec {
    fn default() -> Self {
        Self {
            width: 0.5,
            length: 1.0,
        }
    }
}

impl TowelSpec {
    /// Random towel drawn uniformly from the usual size ranges.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            width: rng.random_range(0.1..=2.0),
            length: rng.random_range(0.2..=3.0),
        }
    }
}

/// Build the 4-corner outline of a towel centred on the origin.
pub fn build_towel_outline(spec: &TowelSpec) -> Result<Outline> {
    require_positive("width", spec.width)?;
    require_positive("length", spec.length)?;

    let (w, l) = (spec.width / 2.0, spec.length / 2.0);
    let vertices = vec![
        DVec3::new(-w, -l, 0.0),
        DVec3::new(-w, l, 0.0),
        DVec3::new(w, l, 0.0),
        DVec3::new(w, -l, 0.0),
    ];
    Ok(Outline::new(TOWEL, vertices))
}
