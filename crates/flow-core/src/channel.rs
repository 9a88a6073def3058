//! Parametric trapezoidal channel.
//!
//! The section is built with its invert at elevation 0 and both walls rising
//! to `wall_margin × depth`:
//!
//! ```text
//!  (0, m·d)                                   (L + b + R, m·d)
//!      \                                         /
//!       \_______________________________________/
//!     (L, 0)                               (L + b, 0)
//! ```
//!
//! with `L = m·d·left_side_slope`, `R = m·d·right_side_slope`.

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::profile::Profile;

/// Trapezoid definition. Side slopes are horizontal run per unit rise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapezoidParams {
    pub depth: f64,
    pub bottom_width: f64,
    pub left_side_slope: f64,
    pub right_side_slope: f64,
}

impl TrapezoidParams {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("depth", self.depth),
            ("bottom width", self.bottom_width),
            ("left side slope", self.left_side_slope),
            ("right side slope", self.right_side_slope),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(InputError::Trapezoid(format!("{name} is not finite")).into());
            }
        }
        if self.depth <= 0.0 {
            return Err(InputError::Trapezoid(format!("depth must be positive, got {}", self.depth)).into());
        }
        for (name, value) in &fields[1..] {
            if *value < 0.0 {
                return Err(InputError::Trapezoid(format!("{name} must be non-negative, got {value}")).into());
            }
        }
        if self.bottom_width == 0.0 && self.left_side_slope == 0.0 && self.right_side_slope == 0.0 {
            return Err(InputError::Trapezoid("channel has zero width".into()).into());
        }
        Ok(())
    }

    /// Closed-form wetted area at `depth` above the invert.
    pub fn area_at(&self, depth: f64) -> f64 {
        depth * (self.bottom_width + 0.5 * depth * (self.left_side_slope + self.right_side_slope))
    }
}

/// Synthesize the 4-vertex station/elevation profile of a trapezoid.
pub fn build_trapezoid(params: &TrapezoidParams, wall_margin: f64) -> Result<Profile> {
    params.validate()?;
    if !(wall_margin.is_finite() && wall_margin >= 1.0) {
        return Err(InputError::Trapezoid(format!("wall margin must be at least 1, got {wall_margin}")).into());
    }

    let wall = params.depth * wall_margin;
    let left_toe = wall * params.left_side_slope;
    let right_toe = wall * params.right_side_slope;
    let right_bottom = left_toe + params.bottom_width;

    Profile::from_points(&[
        (0.0, wall),
        (left_toe, 0.0),
        (right_bottom, 0.0),
        (right_bottom + right_toe, wall),
    ])
}
