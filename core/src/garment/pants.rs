//! Polygonal pants outline
//!
//! The waist runs along `y = 0` and the crotch hangs below it on the
//! centerline. Each pipe (leg) leaves the waist at `pipe_angle` degrees off
//! vertical; its hem is a segment of `pipe_bottom_width` perpendicular to
//! the pipe direction.

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Outline, TROUSERS, mirror_half, recenter_and_scale, require_finite, require_positive};
use crate::error::{GeometryError, Result};

/// Keypoint labels of a pants outline, in vertex order.
pub const PANTS_KEYPOINTS: [&str; 7] = [
    "crotch",
    "pipe_right_bottom_left",
    "pipe_right_bottom_right",
    "waist_right",
    "waist_left",
    "pipe_left_bottom_left",
    "pipe_left_bottom_right",
];

/// Parameters of polygonal pants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PantsSpec {
    /// Width of the waistband.
    pub waist_width: f64,
    /// Depth of the crotch below the waist.
    pub crotch_depth: f64,
    /// Angle of each pipe off vertical, in degrees.
    pub pipe_angle: f64,
    /// Length of each pipe.
    pub pipe_length: f64,
    /// Width of each pipe opening.
    pub pipe_bottom_width: f64,
    /// Uniform scale applied to the finished outline.
    pub scale: f64,
}

impl Default for PantsSpec {
    fn default() -> Self {
        Self {
            waist_width: 0.4,
            crotch_depth: 0.2,
            pipe_angle: 10.0,
            pipe_length: 0.8,
            pipe_bottom_width: 0.1,
            scale: 0.635,
        }
    }
}

impl PantsSpec {
    /// Random pants with every parameter drawn uniformly from its usual range.
    ///
    /// The pipe angle starts at 1° so the two legs never meet on the centerline.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            waist_width: rng.random_range(0.3..=0.5),
            crotch_depth: rng.random_range(0.1..=0.3),
            pipe_angle: rng.random_range(1.0..=20.0),
            pipe_length: rng.random_range(0.3..=1.5),
            pipe_bottom_width: rng.random_range(0.05..=0.25),
            scale: rng.random_range(0.2..=1.5),
        }
    }

    fn validate(&self) -> Result<()> {
        require_positive("waist_width", self.waist_width)?;
        require_positive("crotch_depth", self.crotch_depth)?;
        require_positive("pipe_length", self.pipe_length)?;
        require_positive("pipe_bottom_width", self.pipe_bottom_width)?;
        require_positive("scale", self.scale)?;
        require_finite("pipe_angle", self.pipe_angle)
    }
}

/// Build the 7-vertex outline of a pair of pants.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidGeometry`] when the inner hem corners
/// reach the centerline (the legs would touch or overlap), and
/// [`GeometryError::InvalidParameter`] for non-positive or non-finite inputs.
pub fn build_pants_outline(spec: &PantsSpec) -> Result<Outline> {
    spec.validate()?;

    let waist_right = DVec3::new(spec.waist_width / 2.0, 0.0, 0.0);
    let crotch = DVec3::new(0.0, -spec.crotch_depth, 0.0);

    let angle = spec.pipe_angle.to_radians();
    let pipe_start = DVec3::new(spec.pipe_bottom_width / 2.0, 0.0, 0.0);
    let pipe_direction = DVec3::new(
        angle.sin() * spec.pipe_length,
        -angle.cos() * spec.pipe_length,
        0.0,
    );

    let pipe_bottom_middle = pipe_start + pipe_direction;
    let offset = pipe_direction.cross(DVec3::Z).normalize() * (spec.pipe_bottom_width / 2.0);
    let pipe_bottom_left = pipe_bottom_middle + offset;
    let pipe_bottom_right = pipe_bottom_middle - offset;

    if pipe_bottom_left.x <= 0.0 {
        return Err(GeometryError::InvalidGeometry {
            reason: format!(
                "inner hem corner at x = {} reaches the centerline; increase pipe_angle",
                pipe_bottom_left.x
            ),
        });
    }

    let right_half = vec![crotch, pipe_bottom_left, pipe_bottom_right, waist_right];
    // The crotch lies on the centerline and is not duplicated.
    let mut vertices = mirror_half(right_half, 1..4);
    recenter_and_scale(&mut vertices, pipe_bottom_left.y / 2.0, spec.scale);

    tracing::debug!(pipe_angle = spec.pipe_angle, "built pants outline");
    Ok(Outline::new(TROUSERS, vertices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_default_pants_layout() {
        let spec = PantsSpec::default();
        let outline = build_pants_outline(&spec).unwrap();
        assert_eq!(outline.len(), 7);
        assert_eq!(outline.category().name, "trousers");

        let v = outline.vertices();
        assert!(v[0].x.abs() < 1e-12, "crotch on the centerline");
        for (right, left) in [(1, 6), (2, 5), (3, 4)] {
            assert!((v[right].x + v[left].x).abs() < 1e-12);
            assert!((v[right].y - v[left].y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hem_is_perpendicular_and_sized() {
        let spec = PantsSpec {
            scale: 1.0,
            ..PantsSpec::default()
        };
        let outline = build_pants_outline(&spec).unwrap();
        let left = outline.keypoint("pipe_right_bottom_left").unwrap();
        let right = outline.keypoint("pipe_right_bottom_right").unwrap();
        assert!((left.distance(right) - spec.pipe_bottom_width).abs() < 1e-9);

        let angle = spec.pipe_angle.to_radians();
        let direction = DVec3::new(angle.sin(), -angle.cos(), 0.0);
        assert!((right - left).dot(direction).abs() < 1e-9);
    }

    #[test]
    fn test_vertically_centered_on_hem() {
        let spec = PantsSpec {
            scale: 1.0,
            ..PantsSpec::default()
        };
        let outline = build_pants_outline(&spec).unwrap();
        let waist = outline.keypoint("waist_right").unwrap();
        let hem = outline.keypoint("pipe_right_bottom_left").unwrap();
        assert!((waist.y + hem.y).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_pipes_touch_centerline() {
        let spec = PantsSpec {
            pipe_angle: 0.0,
            ..PantsSpec::default()
        };
        assert!(matches!(
            build_pants_outline(&spec),
            Err(GeometryError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_sampled_pants_build() {
        let mut rng = Pcg64::seed_from_u64(11);
        for _ in 0..200 {
            let spec = PantsSpec::sample(&mut rng);
            let outline = build_pants_outline(&spec).unwrap();
            assert!(outline.vertices().iter().all(|v| v.is_finite()));
        }
    }
}
