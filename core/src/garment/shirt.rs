//! Polygonal shirt outline
//!
//! The right half is laid out in normalised units where the hem sits at
//! `y = 0` and the top of the neck at `y = 1`:
//!
//! ```text
//!            neck_bottom (0, 1 - neck_depth)
//!                 |     neck_top (neck_width / 2, 1)
//!                 |        \__ shoulder ______ sleeve_top
//!                 |                           |
//!                 |          armpit _________ sleeve_bottom
//!                 |            |
//!                 |        bottom_side (bottom_width / 2, 0)
//! ```
//!
//! The armpit sits straight above the hem corner. Its drop below the
//! shoulder follows from the right triangle formed by the shoulder, the
//! armpit and the sleeve opening: with `A = |bottom_width - shoulder_width| / 2`
//! and hypotenuse `sleeve_width_start`, the drop is
//! `B = sqrt(sleeve_width_start² - A²)`.

use glam::{DQuat, DVec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    LONG_SLEEVED_SHIRT, Outline, SHORT_SLEEVED_SHIRT, mirror_half, recenter_and_scale,
    require_finite, require_positive,
};
use crate::error::{GeometryError, Result};

/// Keypoint labels of a shirt outline, in vertex order.
pub const SHIRT_KEYPOINTS: [&str; 13] = [
    "bottom_right",
    "armpit_right",
    "sleeve_bottom_right",
    "sleeve_top_right",
    "shoulder_right",
    "neck_right",
    "neck_middle",
    "neck_left",
    "shoulder_left",
    "sleeve_top_left",
    "sleeve_bottom_left",
    "armpit_left",
    "bottom_left",
];

/// Sleeves longer than this make the shirt long-sleeved.
const LONG_SLEEVE_THRESHOLD: f64 = 0.5;

/// How the shoulder point is placed vertically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShoulderPlacement {
    /// Absolute height, in units where the neck top is at 1.0.
    Height(f64),
    /// Slope of the neck-to-shoulder seam below horizontal, in degrees.
    Angle(f64),
}

impl ShoulderPlacement {
    /// Resolve to an absolute shoulder height.
    pub fn height(&self, shoulder_width: f64, neck_width: f64) -> f64 {
        match *self {
            ShoulderPlacement::Height(h) => h,
            ShoulderPlacement::Angle(degrees) => {
                let run = shoulder_width / 2.0 - neck_width / 2.0;
                1.0 - degrees.to_radians().tan() * run
            }
        }
    }
}

/// Parameters of a polygonal shirt.
///
/// Lengths are relative to the body height (hem to neck top = 1.0) before
/// `scale` is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShirtSpec {
    /// Width of the hem.
    pub bottom_width: f64,
    /// Width of the neck opening.
    pub neck_width: f64,
    /// How far the neckline dips below the neck top.
    pub neck_depth: f64,
    /// Distance between the two shoulder points.
    pub shoulder_width: f64,
    /// Vertical placement of the shoulders.
    pub shoulder: ShoulderPlacement,
    /// Width of the sleeve where it joins the body.
    pub sleeve_width_start: f64,
    /// Width of the sleeve opening.
    pub sleeve_width_end: f64,
    /// Sleeve length, measured horizontally before tilting.
    pub sleeve_length: f64,
    /// Downward tilt of the sleeve in degrees (negative tilts it up).
    pub sleeve_angle: f64,
    /// Uniform scale applied to the finished outline.
    pub scale: f64,
}

impl Default for ShirtSpec {
    fn default() -> Self {
        Self {
            bottom_width: 0.65,
            neck_width: 0.32,
            neck_depth: 0.08,
            shoulder_width: 0.62,
            shoulder: ShoulderPlacement::Height(0.95),
            sleeve_width_start: 0.28,
            sleeve_width_end: 0.18,
            sleeve_length: 0.76,
            sleeve_angle: -3.0,
            scale: 0.635,
        }
    }
}

impl ShirtSpec {
    /// Random shirt with every parameter drawn uniformly from its usual range.
    ///
    /// The sleeve start width is drawn from a range clamped to the armpit
    /// precondition. Draws whose outline is not simple (a short sleeve tilted
    /// far down folds back into the body) are discarded, so sampled specs
    /// always build.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let spec = Self::draw(rng);
            if build_shirt_outline(&spec).is_ok() {
                return spec;
            }
        }
    }

    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let bottom_width: f64 = rng.random_range(0.6..=0.75);
        let shoulder_width: f64 = rng.random_range(0.4..=0.8);
        let half_difference = (bottom_width - shoulder_width).abs() / 2.0;
        let sleeve_start_min = half_difference.max(0.22);
        let sleeve_start_max = sleeve_start_min.max(0.34);

        Self {
            bottom_width,
            neck_width: rng.random_range(0.2..=0.4),
            neck_depth: rng.random_range(0.0..0.2),
            shoulder_width,
            shoulder: ShoulderPlacement::Height(rng.random_range(0.9..=1.0)),
            sleeve_width_start: rng.random_range(sleeve_start_min..=sleeve_start_max),
            sleeve_width_end: rng.random_range(0.14..=0.22),
            sleeve_length: rng.random_range(0.05..=1.0),
            sleeve_angle: rng.random_range(-10.0..=60.0),
            scale: rng.random_range(0.2..=1.5),
        }
    }

    /// Whether the sleeves are long enough to count as long-sleeved.
    pub fn is_long_sleeved(&self) -> bool {
        self.sleeve_length > LONG_SLEEVE_THRESHOLD
    }

    fn validate(&self) -> Result<()> {
        require_positive("bottom_width", self.bottom_width)?;
        require_positive("neck_width", self.neck_width)?;
        require_positive("shoulder_width", self.shoulder_width)?;
        require_positive("sleeve_width_start", self.sleeve_width_start)?;
        require_positive("sleeve_width_end", self.sleeve_width_end)?;
        require_positive("sleeve_length", self.sleeve_length)?;
        require_positive("scale", self.scale)?;
        require_finite("sleeve_angle", self.sleeve_angle)?;
        if !(self.neck_depth.is_finite() && (0.0..1.0).contains(&self.neck_depth)) {
            return Err(GeometryError::invalid_param(
                "neck_depth",
                self.neck_depth,
                "must be in [0, 1)",
            ));
        }
        let shoulder_height = self.shoulder.height(self.shoulder_width, self.neck_width);
        require_finite("shoulder_height", shoulder_height)
    }
}

/// Build the 13-vertex outline of a shirt.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidGeometry`] when `sleeve_width_start` is
/// shorter than half the difference between hem and shoulder widths or the
/// finished outline crosses itself, and [`GeometryError::InvalidParameter`] for non-positive or non-finite inputs.
pub fn build_shirt_outline(spec: &ShirtSpec) -> Result<Outline> {
    spec.validate()?;

    let bottom_side = DVec3::new(spec.bottom_width / 2.0, 0.0, 0.0);

    let neck_top = DVec3::new(spec.neck_width / 2.0, 1.0, 0.0);
    let neck_bottom = DVec3::new(0.0, 1.0 - spec.neck_depth, 0.0);

    let shoulder_height = spec.shoulder.height(spec.shoulder_width, spec.neck_width);
    let shoulder = DVec3::new(spec.shoulder_width / 2.0, shoulder_height, 0.0);

    let a = (spec.bottom_width - spec.shoulder_width).abs() / 2.0;
    let c = spec.sleeve_width_start;
    if c < a {
        return Err(GeometryError::InvalidGeometry {
            reason: format!(
                "sleeve_width_start {} is shorter than half the hem/shoulder width difference {}",
                c, a
            ),
        });
    }
    let b = (c * c - a * a).sqrt();
    let armpit = DVec3::new(spec.bottom_width / 2.0, shoulder_height - b, 0.0);

    let sleeve_middle = (shoulder + armpit) / 2.0;
    let sleeve_end = sleeve_middle + DVec3::new(spec.sleeve_length, 0.0, 0.0);
    let half_opening = DVec3::new(0.0, spec.sleeve_width_end / 2.0, 0.0);

    let tilt = DQuat::from_rotation_z(-spec.sleeve_angle.to_radians());
    let rotate = |p: DVec3| sleeve_middle + tilt * (p - sleeve_middle);
    let sleeve_end_top = rotate(sleeve_end + half_opening);
    let sleeve_end_bottom = rotate(sleeve_end - half_opening);

    let right_half = vec![
        bottom_side,
        armpit,
        sleeve_end_bottom,
        sleeve_end_top,
        shoulder,
        neck_top,
        neck_bottom,
    ];
    // neck_bottom lies on the centerline and is not duplicated.
    let mut vertices = mirror_half(right_half, 0..6);
    recenter_and_scale(&mut vertices, 0.5, spec.scale);

    let category = if spec.is_long_sleeved() {
        LONG_SLEEVED_SHIRT
    } else {
        SHORT_SLEEVED_SHIRT
    };
    let outline = Outline::new(category, vertices);
    if !outline.is_simple() {
        return Err(GeometryError::InvalidGeometry {
            reason: format!(
                "sleeve of length {} at {} degrees folds back into the body",
                spec.sleeve_length, spec.sleeve_angle
            ),
        });
    }
    tracing::debug!(
        category = category.name,
        armpit_drop = b,
        "built shirt outline"
    );
    Ok(outline)
}
